//! Hover and scroll policies as pure functions from input to transition
//! requests. The loop applies the requests; these functions only decide.

use glam::Vec3;
use shaderloop_common::{Hit, ObjectId};

use crate::config::{HoverPolicy, ScrollPolicy};
use crate::uniform::UniformName;

/// A transition the loop should start (or keep, if already heading there).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionRequest {
    Uniform {
        name: UniformName,
        target: f32,
        duration: f32,
    },
    Camera {
        target: Vec3,
        duration: f32,
    },
}

/// Whether the tracked object is among the hits. Hits on other objects
/// never count, whatever their distance.
pub fn is_target_hit(hits: &[Hit], target: ObjectId) -> bool {
    hits.iter().any(|h| h.object == target)
}

pub fn hover_request(policy: &HoverPolicy, hovered: bool) -> TransitionRequest {
    TransitionRequest::Uniform {
        name: policy.uniform,
        target: if hovered { policy.active } else { policy.inactive },
        duration: policy.duration,
    }
}

/// Requests for one scroll fraction. The thresholds are checked
/// independently, so above the upper threshold both the raised value and
/// the framing camera are requested. A fraction exactly on the lower
/// threshold requests nothing.
pub fn scroll_requests(policy: &ScrollPolicy, fraction: f32) -> Vec<TransitionRequest> {
    let mut out = Vec::with_capacity(2);
    if fraction > policy.lower_threshold {
        out.push(TransitionRequest::Uniform {
            name: policy.uniform,
            target: policy.raised_value,
            duration: policy.value_duration,
        });
    }
    if fraction > policy.upper_threshold {
        out.push(TransitionRequest::Camera {
            target: policy.framing_camera,
            duration: policy.camera_duration,
        });
    }
    if fraction < policy.lower_threshold {
        out.push(TransitionRequest::Uniform {
            name: policy.uniform,
            target: policy.rest_value,
            duration: policy.value_duration,
        });
        out.push(TransitionRequest::Camera {
            target: policy.rest_camera,
            duration: policy.camera_duration,
        });
    }
    out
}

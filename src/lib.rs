//! Lumina compiles free-text lighting instructions into per-pixel programs for addressable LED
//! rooflines.
//!
//! The pipeline is a chain of pure transforms, each returning a new value:
//!
//! - [`parse_intent`] turns text into a [`DesignIntent`] with ambiguities and a confidence score
//! - [`solve`] checks the intent against a [`RooflineConfiguration`]
//! - [`build_questions`] and [`apply_clarifications`] resolve what the text left open
//! - [`lower_intent`] / [`lower_template`] paint pixels, [`encode_pixels`] /
//!   [`encode_segment`] build the controller message
//!
//! [`DesignSession`] drives the whole chain; [`deliver`] sends the result with bounded retry.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod clarify;
pub(crate) mod encode;
pub(crate) mod lower;
pub(crate) mod model;
pub(crate) mod parse;
pub(crate) mod session;
pub(crate) mod solve;
pub(crate) mod transport;

pub use crate::foundation::color::{Rgbw, normalized_contrast, parse_hex};
pub use crate::foundation::error::{LuminaError, LuminaResult};
pub use crate::foundation::opts::{
    ClarifyOpts, ConfidenceOpts, EngineOpts, OutputOpts, ParseOpts, SolverOpts, TransportOpts,
};

pub use crate::model::effect::{Effect, EffectCategory, EffectInfo};
pub use crate::model::group::LedColorGroup;
pub use crate::model::intent::{
    AmbiguityFlag, AmbiguityKind, ChoiceValue, ClarificationChoice, ColorAssignment,
    DesignIntent, DesignLayer, MotionDirection, MotionSettings, MotionType, PatternRule,
    PixelRange, SpacingRule, ZoneSelector,
};
pub use crate::model::roofline::{
    ArchitecturalRole, Location, RooflineConfiguration, RooflineDef, Segment, SegmentDirection,
    SegmentType,
};

pub use crate::parse::assemble::{parse_intent, parse_intent_at};
pub use crate::solve::constraints::{ConstraintKind, ConstraintResult, SolveReport, solve};
pub use crate::solve::spacing::{
    SpacingAlternative, SpacingCheck, check_equally_spaced, check_every_nth, check_pattern,
    check_spacing,
};

pub use crate::clarify::apply::{Answer, Answers, EnteredValue, apply_clarifications};
pub use crate::clarify::questions::{
    ClarificationKind, ClarificationOption, ClarificationQuestion, OptionHint, build_questions,
};

pub use crate::lower::intent::lower_intent;
pub use crate::lower::merge::merge_groups;
pub use crate::lower::template::{PatternTemplate, ResolvedPattern, lower_template};

pub use crate::encode::payload::{
    DevicePayload, SegmentEffect, SegmentPayload, encode_pixels, encode_segment,
};

pub use crate::transport::command::{
    BridgeCommand, CommandKind, HttpMethod, command_topic, status_topic,
};
pub use crate::transport::retry::{
    DeliveryReport, DeviceTransport, InMemoryTransport, RetryPolicy, TransportFailure, deliver,
};
pub use crate::transport::store::{DesignStore, MemoryDesignStore, StoredDesign};

pub use crate::session::design::{
    AcceptRecommended, ClarificationResponder, DesignSession, PayloadForm, ResolveOutcome,
};

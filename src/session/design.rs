use crate::clarify::apply::{Answer, Answers, apply_clarifications};
use crate::clarify::questions::{ClarificationQuestion, build_questions};
use crate::encode::payload::{DevicePayload, SegmentEffect, encode_pixels, encode_segment};
use crate::foundation::error::{LuminaError, LuminaResult};
use crate::foundation::opts::EngineOpts;
use crate::lower::intent::lower_intent;
use crate::model::group::LedColorGroup;
use crate::model::intent::DesignIntent;
use crate::model::roofline::RooflineConfiguration;
use crate::parse::assemble::parse_intent;
use crate::solve::constraints::{SolveReport, solve};
use crate::transport::command::BridgeCommand;
use crate::transport::retry::{DeliveryReport, DeviceTransport, deliver};
use crate::transport::store::{DesignStore, StoredDesign};
use serde::{Deserialize, Serialize};

/// Upper bound on question rounds in [`DesignSession::resolve_with`].
const MAX_ROUNDS: usize = 8;

/// Obtains answers from a person.
///
/// Returning `None` abandons the round; the session keeps its intent as it was before the
/// round started.
pub trait ClarificationResponder {
    fn respond(&mut self, questions: &[ClarificationQuestion]) -> Option<Answers>;
}

impl<F> ClarificationResponder for F
where
    F: FnMut(&[ClarificationQuestion]) -> Option<Answers>,
{
    fn respond(&mut self, questions: &[ClarificationQuestion]) -> Option<Answers> {
        self(questions)
    }
}

/// Answers every question with its recommended option.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptRecommended;

impl ClarificationResponder for AcceptRecommended {
    fn respond(&mut self, questions: &[ClarificationQuestion]) -> Option<Answers> {
        Some(
            questions
                .iter()
                .filter_map(|q| {
                    let option = q.recommended()?;
                    Some((q.id.clone(), Answer::from(option.id.as_str())))
                })
                .collect(),
        )
    }
}

/// How [`DesignSession::resolve_with`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// No ambiguities remain.
    Resolved,
    /// The responder gave up.
    Abandoned { remaining: usize },
    /// A round of answers removed nothing, or the round limit was hit.
    Stalled { remaining: usize },
}

/// Which payload form to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PayloadForm {
    /// Explicit per-pixel colors.
    #[default]
    Pixels,
    /// Segment colors plus a device effect.
    Segment,
}

/// Parse, check, clarify and lower one design against one installation.
///
/// Each step replaces the session's intent with a new value; nothing is mutated in place.
#[derive(Debug, Clone)]
pub struct DesignSession {
    config: Option<RooflineConfiguration>,
    opts: EngineOpts,
    intent: Option<DesignIntent>,
}

impl DesignSession {
    pub fn new(config: Option<RooflineConfiguration>, opts: EngineOpts) -> Self {
        Self {
            config,
            opts,
            intent: None,
        }
    }

    /// Session resuming an existing intent.
    pub fn with_intent(
        config: Option<RooflineConfiguration>,
        opts: EngineOpts,
        intent: DesignIntent,
    ) -> Self {
        Self {
            config,
            opts,
            intent: Some(intent),
        }
    }

    pub fn config(&self) -> Option<&RooflineConfiguration> {
        self.config.as_ref()
    }

    pub fn opts(&self) -> &EngineOpts {
        &self.opts
    }

    /// Current intent, if anything has been parsed.
    pub fn intent(&self) -> Option<&DesignIntent> {
        self.intent.as_ref()
    }

    fn current(&self) -> LuminaResult<&DesignIntent> {
        self.intent
            .as_ref()
            .ok_or_else(|| LuminaError::validation("no design has been parsed"))
    }

    fn roofline(&self) -> LuminaResult<&RooflineConfiguration> {
        self.config
            .as_ref()
            .ok_or_else(|| LuminaError::validation("no roofline configuration loaded"))
    }

    /// Parse `text`, replacing any current intent.
    pub fn parse(&mut self, text: &str) -> &DesignIntent {
        let intent = parse_intent(text, self.config.as_ref(), &self.opts);
        self.intent.insert(intent)
    }

    /// Run the solver and fold what it found back into the intent.
    pub fn check(&mut self) -> LuminaResult<SolveReport> {
        let intent = self.current()?;
        let report = solve(intent, self.roofline()?, &self.opts);
        let annotated = report.annotate(intent, &self.opts.confidence);
        self.intent = Some(annotated);
        Ok(report)
    }

    /// Questions for every outstanding ambiguity; empty when nothing is parsed.
    pub fn questions(&self) -> Vec<ClarificationQuestion> {
        match &self.intent {
            Some(intent) => build_questions(intent, self.config.as_ref(), &self.opts),
            None => Vec::new(),
        }
    }

    /// Apply answers to the current questions.
    pub fn answer(&mut self, answers: &Answers) -> LuminaResult<&DesignIntent> {
        let intent = self.current()?;
        let questions = build_questions(intent, self.config.as_ref(), &self.opts);
        let next = apply_clarifications(intent, &questions, answers, &self.opts);
        Ok(self.intent.insert(next))
    }

    /// Put questions to `responder` until the intent is resolved, the responder abandons, or a
    /// round makes no progress.
    #[tracing::instrument(skip_all)]
    pub fn resolve_with<R: ClarificationResponder + ?Sized>(
        &mut self,
        responder: &mut R,
    ) -> LuminaResult<ResolveOutcome> {
        for round in 0..MAX_ROUNDS {
            let before = self.current()?.ambiguities().len();
            if before == 0 {
                return Ok(ResolveOutcome::Resolved);
            }
            let questions = self.questions();
            let Some(answers) = responder.respond(&questions) else {
                tracing::debug!(round, remaining = before, "clarification abandoned");
                return Ok(ResolveOutcome::Abandoned { remaining: before });
            };
            let after = self.answer(&answers)?.ambiguities().len();
            tracing::debug!(round, before, after, "clarification round");
            if after == 0 {
                return Ok(ResolveOutcome::Resolved);
            }
            if after >= before {
                return Ok(ResolveOutcome::Stalled { remaining: after });
            }
        }
        Ok(ResolveOutcome::Stalled {
            remaining: self.current()?.ambiguities().len(),
        })
    }

    /// Pixel groups covering the whole installation.
    pub fn lower(&self) -> LuminaResult<Vec<LedColorGroup>> {
        Ok(lower_intent(self.current()?, self.roofline()?))
    }

    pub fn pixel_payload(&self) -> LuminaResult<DevicePayload> {
        let config = self.roofline()?;
        let groups = lower_intent(self.current()?, config);
        Ok(encode_pixels(
            &groups,
            Some(config.total_pixel_count()),
            &self.opts.output,
        ))
    }

    pub fn segment_payload(&self) -> LuminaResult<DevicePayload> {
        let effect = SegmentEffect::from_intent(self.current()?);
        Ok(encode_segment(
            &effect,
            self.roofline()?.total_pixel_count(),
            &self.opts.output,
        ))
    }

    pub fn payload(&self, form: PayloadForm) -> LuminaResult<DevicePayload> {
        match form {
            PayloadForm::Pixels => self.pixel_payload(),
            PayloadForm::Segment => self.segment_payload(),
        }
    }

    /// Encode the design and send it to the controller at `controller_ip`.
    pub fn send<T: DeviceTransport + ?Sized>(
        &self,
        transport: &mut T,
        controller_ip: &str,
        form: PayloadForm,
    ) -> LuminaResult<DeliveryReport> {
        let command = BridgeCommand::set_state(controller_ip, &self.payload(form)?)?;
        Ok(deliver(transport, &command, &self.opts.transport.retry))
    }

    /// Persist the current intent under `design_id`.
    pub fn save<S: DesignStore + ?Sized>(
        &self,
        store: &mut S,
        user_id: &str,
        design_id: &str,
        name: &str,
    ) -> LuminaResult<()> {
        let design = StoredDesign::new(design_id, name, self.current()?.clone());
        store.save(user_id, design)
    }

    /// Replace the current intent with a stored one. Returns `false` when it does not exist.
    pub fn load<S: DesignStore + ?Sized>(
        &mut self,
        store: &S,
        user_id: &str,
        design_id: &str,
    ) -> LuminaResult<bool> {
        match store.load(user_id, design_id)? {
            Some(design) => {
                self.intent = Some(design.intent);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/design.rs"]
mod tests;

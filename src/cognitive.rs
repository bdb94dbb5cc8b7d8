//! Attention-check scoring.
//!
//! Some trials end with a question (17) asking which direction was cued.
//! In a well-formed trial the class tag sits four rows before the question
//! (`tag, 44, 45, 46, 17`) and the answer immediately after it; the right
//! answer is `tag + 30`.
use tracing::{info, warn};

use crate::codes::{ANSWER_OFFSET, QUESTION};
use crate::error::EventError;
use crate::stream::EventStream;

/// Rows between the class tag and the question.
const TAG_LOOKBACK: usize = 4;

/// Attention-check tally for one stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CognitiveScore {
    pub correct: usize,
    /// Includes `skipped`.
    pub wrong:   usize,
    /// Questions without a tag four rows back or an answer after them.
    pub skipped: usize,
}

impl CognitiveScore {
    pub fn total(&self) -> usize {
        self.correct + self.wrong
    }
}

/// Score every question in a corrected stream.
///
/// Questions lacking context are counted as wrong.  The tally is checked
/// against the 17s of the stream's count table; the two agree for any
/// stream scored in full, so the error only signals a scoring defect.
pub fn score_cognitive_control(stream: &EventStream) -> Result<CognitiveScore, EventError> {
    let events = stream.events();
    let mut score = CognitiveScore::default();

    for (i, e) in events.iter().enumerate() {
        if e.code != QUESTION {
            continue;
        }
        let context = i.checked_sub(TAG_LOOKBACK)
            .and_then(|t| Some((events[t].code, events.get(i + 1)?.code)));
        match context {
            Some((tag, answer)) if answer.checked_sub(ANSWER_OFFSET) == Some(tag) => score.correct += 1,
            Some(_) => score.wrong += 1,
            None => {
                score.skipped += 1;
                score.wrong += 1;
            }
        }
    }

    if score.skipped > 0 {
        warn!(skipped = score.skipped, "questions skipped due to insufficient context");
    }

    let questions = stream.count_table().get(QUESTION);
    if score.total() != questions {
        return Err(EventError::InvalidCognitiveControlTally {
            correct:   score.correct,
            wrong:     score.wrong,
            questions,
        });
    }

    if score.wrong == 0 {
        info!(questions, "all cognitive control answers are correct");
    } else {
        info!(correct = score.correct, wrong = score.wrong, questions, "cognitive control results");
    }
    Ok(score)
}

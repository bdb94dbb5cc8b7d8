/// Shared helpers: synthetic protocol streams with acquisition-like timing.
use innerspeech::codes::correction_offset;
use innerspeech::{Event, EventStream};
use ndarray::Array2;

/// Extra samples on top of the nominal interval between two markers, so a
/// synthesized replacement always lands before the real successor.
pub const JITTER: u64 = 50;

/// Samples between block-level markers (15, 16, 51, 21..=23).
pub const BLOCK_GAP: u64 = 1000;

#[derive(Debug, Clone, Copy)]
pub struct Trial {
    pub tag:    i32,
    /// Answer code when the trial ends with an attention check.
    pub answer: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct Run {
    pub block_code: i32,
    pub trials:     Vec<Trial>,
}

impl Run {
    /// `n` trials cycling through the four tags; every `q_every`-th trial
    /// carries a correctly answered question.
    #[allow(unused)]
    pub fn balanced(block_code: i32, n: usize, q_every: usize) -> Self {
        let trials = (0..n)
            .map(|i| {
                let tag = 31 + (i % 4) as i32;
                let answer = (q_every > 0 && i % q_every == q_every - 1).then_some(tag + 30);
                Trial { tag, answer }
            })
            .collect();
        Self { block_code, trials }
    }
}

struct Clock {
    t: u64,
    events: Vec<Event>,
}

impl Clock {
    fn push(&mut self, gap: u64, code: i32) {
        self.t += gap;
        self.events.push(Event::new(self.t, 65280 + code as i64, code));
    }

    fn push_marker(&mut self, code: i32) {
        self.push(correction_offset(code) + JITTER, code);
    }
}

/// Baseline `11 12 13 14`, then for every run
/// `[51] 15 <block> (42 tag 44 45 46 [17 ans])* 16`.
#[allow(unused)]
pub fn protocol(runs: &[Run]) -> Vec<Event> {
    let mut c = Clock { t: 0, events: Vec::new() };
    c.push(0, 11);
    c.push(100, 12);
    c.push(100, 13);
    c.push(15360, 14);

    for (r, run) in runs.iter().enumerate() {
        if r > 0 {
            c.push(BLOCK_GAP, 51);
        }
        c.push(BLOCK_GAP, 15);
        c.push(BLOCK_GAP, run.block_code);
        for trial in &run.trials {
            c.push_marker(42);
            c.push_marker(trial.tag);
            c.push_marker(44);
            c.push_marker(45);
            c.push_marker(46);
            if let Some(answer) = trial.answer {
                c.push_marker(17);
                c.push(correction_offset(61) + JITTER, answer);
            }
        }
        c.push(BLOCK_GAP, 16);
    }
    c.events
}

/// Three runs (pronounced, inner, visualized), 8 trials each, a question
/// after trials 2 (tag 33, answer 63) and 5 (tag 32, answer 62).
#[allow(unused)]
pub fn standard_block() -> Vec<Event> {
    protocol(&[
        Run::balanced(21, 8, 3),
        Run::balanced(22, 8, 3),
        Run::balanced(23, 8, 3),
    ])
}

/// Drop the `n`-th (0-based) occurrence of `code`.
#[allow(unused)]
pub fn remove_nth(events: &[Event], code: i32, n: usize) -> Vec<Event> {
    let idx = events.iter()
        .enumerate()
        .filter(|(_, e)| e.code == code)
        .nth(n)
        .map(|(i, _)| i)
        .unwrap_or_else(|| panic!("no occurrence {n} of code {code}"));
    let mut out = events.to_vec();
    out.remove(idx);
    out
}

#[allow(unused)]
pub fn stream(events: Vec<Event>) -> EventStream {
    EventStream::from_events(events)
}

#[allow(unused)]
pub fn codes(s: &EventStream) -> Vec<i32> {
    s.codes().collect()
}

#[allow(unused)]
/// `[N, 3]` raw table, as handed over by the event-extraction step.
pub fn to_table(events: &[Event]) -> Array2<i64> {
    EventStream::from_events(events.to_vec()).to_table().unwrap()
}

//! Headless display driven by a script of input events

use pcannotate_core::{Display, DisplayEvent, Instance, PointStyle, Result};
use std::collections::VecDeque;

/// A [`Display`] that replays scripted input instead of reading a window.
///
/// Each pump consumes one scripted batch and reports the events for keys
/// that were registered. Once the script runs out every pump reports
/// [`DisplayEvent::Closed`], so a session can never wait forever on it.
#[derive(Debug, Default)]
pub struct ScriptedDisplay {
    script: VecDeque<Vec<DisplayEvent>>,
    registered: Vec<char>,
    shown: Vec<(Instance, PointStyle)>,
    pumps: usize,
    closed: bool,
}

impl ScriptedDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one pump per character of `keys`
    pub fn keys(mut self, keys: &str) -> Self {
        self.script
            .extend(keys.chars().map(|key| vec![DisplayEvent::Key(key)]));
        self
    }

    /// Queue one pump reporting `events`
    pub fn pump(mut self, events: Vec<DisplayEvent>) -> Self {
        self.script.push_back(events);
        self
    }

    /// Queue `count` pumps with no input
    pub fn idle(mut self, count: usize) -> Self {
        self.script.extend(std::iter::repeat_with(Vec::new).take(count));
        self
    }

    /// Everything shown so far, oldest first
    pub fn shown(&self) -> &[(Instance, PointStyle)] {
        &self.shown
    }

    pub fn registered(&self) -> &[char] {
        &self.registered
    }

    pub fn pumps(&self) -> usize {
        self.pumps
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Scripted pumps not consumed yet
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Display for ScriptedDisplay {
    fn show_points(&mut self, points: &Instance, style: &PointStyle) -> Result<()> {
        self.shown.push((points.clone(), *style));
        Ok(())
    }

    fn register_key(&mut self, key: char) {
        if !self.registered.contains(&key) {
            self.registered.push(key);
        }
    }

    fn pump_events(&mut self) -> Result<Vec<DisplayEvent>> {
        if self.closed {
            return Ok(Vec::new());
        }
        self.pumps += 1;
        let Some(batch) = self.script.pop_front() else {
            return Ok(vec![DisplayEvent::Closed]);
        };
        Ok(batch
            .into_iter()
            .filter(|event| match event {
                DisplayEvent::Key(key) => self.registered.contains(key),
                DisplayEvent::Closed => true,
            })
            .collect())
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

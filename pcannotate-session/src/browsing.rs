//! Read-only browsing through the instances of one file

use log::{info, warn};
use pcannotate_core::{BrowseAction, Display, DisplayEvent, Instance, KeyMap, PointStyle, Result};

/// Outcome of a cursor move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Moved to and rendered this index
    Moved(usize),
    /// Already on the last instance
    AtEnd,
    /// Already on the first instance
    AtStart,
}

/// Cursor over a fixed list of instances. Nothing is persisted.
pub struct BrowsingSession {
    instances: Vec<Instance>,
    index: usize,
    stopped: bool,
    style: PointStyle,
}

impl BrowsingSession {
    pub fn new(instances: Vec<Instance>) -> Self {
        Self {
            instances,
            index: 0,
            stopped: false,
            style: PointStyle::browsing(),
        }
    }

    pub fn with_style(mut self, style: PointStyle) -> Self {
        self.style = style;
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn current(&self) -> Option<&Instance> {
        self.instances.get(self.index)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Render the instance under the cursor, if there is one
    pub fn show_current<D: Display + ?Sized>(&self, display: &mut D) -> Result<()> {
        if let Some(instance) = self.current() {
            display.show_points(instance, &self.style)?;
            info!("Showing sample {}/{}", self.index + 1, self.len());
        }
        Ok(())
    }

    pub fn next<D: Display + ?Sized>(&mut self, display: &mut D) -> Result<Step> {
        if self.index + 1 >= self.len() {
            warn!("No more samples to show.");
            return Ok(Step::AtEnd);
        }
        self.index += 1;
        self.show_current(display)?;
        Ok(Step::Moved(self.index))
    }

    pub fn previous<D: Display + ?Sized>(&mut self, display: &mut D) -> Result<Step> {
        if self.index == 0 {
            warn!("Already at the first sample.");
            return Ok(Step::AtStart);
        }
        self.index -= 1;
        self.show_current(display)?;
        Ok(Step::Moved(self.index))
    }

    pub fn quit(&mut self) {
        if !self.stopped {
            info!("Exiting visualization mode.");
        }
        self.stopped = true;
    }

    /// Dispatch one key press through `key_map`, returning the action taken
    pub fn on_key<D: Display + ?Sized>(
        &mut self,
        key: char,
        key_map: &KeyMap<BrowseAction>,
        display: &mut D,
    ) -> Result<Option<BrowseAction>> {
        let Some(action) = key_map.action(key) else {
            return Ok(None);
        };
        match action {
            BrowseAction::Next => {
                self.next(display)?;
            }
            BrowseAction::Previous => {
                self.previous(display)?;
            }
            BrowseAction::Quit => self.quit(),
        }
        Ok(Some(action))
    }

    /// Show the first instance and follow key presses until quit or the
    /// window closes, then close `display`
    pub fn run<D: Display + ?Sized>(
        &mut self,
        display: &mut D,
        key_map: &KeyMap<BrowseAction>,
    ) -> Result<()> {
        for key in key_map.keys() {
            display.register_key(key);
        }
        info!("Browsing {} samples. Keys: {}", self.len(), key_map);
        self.show_current(display)?;

        while !self.stopped {
            for event in display.pump_events()? {
                match event {
                    DisplayEvent::Key(key) => {
                        self.on_key(key, key_map, display)?;
                    }
                    DisplayEvent::Closed => self.quit(),
                }
                if self.stopped {
                    break;
                }
            }
        }

        display.close();
        Ok(())
    }
}

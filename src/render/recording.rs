use super::{Card, DisplaySurface, EmptyReason};

/// A single call made on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCommand {
    Loading,
    Error(String),
    Empty(EmptyReason),
    List(Vec<Card>),
    Counts {
        total: usize,
        filtered: Option<usize>,
    },
}

/// Surface that records every command, for assertions.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<SurfaceCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cards from the most recent `show_list`, if any.
    pub fn last_list(&self) -> Option<&[Card]> {
        self.commands.iter().rev().find_map(|c| match c {
            SurfaceCommand::List(cards) => Some(cards.as_slice()),
            _ => None,
        })
    }

    pub fn last_error(&self) -> Option<&str> {
        self.commands.iter().rev().find_map(|c| match c {
            SurfaceCommand::Error(msg) => Some(msg.as_str()),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl DisplaySurface for RecordingSurface {
    fn show_loading(&mut self) {
        self.commands.push(SurfaceCommand::Loading);
    }

    fn show_error(&mut self, message: &str) {
        self.commands.push(SurfaceCommand::Error(message.to_string()));
    }

    fn show_empty(&mut self, reason: EmptyReason) {
        self.commands.push(SurfaceCommand::Empty(reason));
    }

    fn show_list(&mut self, cards: &[Card]) {
        self.commands.push(SurfaceCommand::List(cards.to_vec()));
    }

    fn update_counts(&mut self, total: usize, filtered: Option<usize>) {
        self.commands.push(SurfaceCommand::Counts { total, filtered });
    }
}

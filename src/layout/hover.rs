use serde::Serialize;

// ---------------------------------------------------------------------------
// Hover interaction payload
// ---------------------------------------------------------------------------

/// Payload emitted while a rendered cell is hovered. The anchor sits just
/// to the right of the cell's band, vertically centered on it, so a
/// tooltip can attach without covering the cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionCell {
    pub x_label: String,
    pub y_label: String,
    /// Tooltip anchor, canvas coordinates.
    pub x_pos: f32,
    pub y_pos: f32,
    /// Coefficient rounded to 2 decimals; `None` for no-data cells.
    pub value: Option<f64>,
}

/// Round a coefficient to two decimal places for display.
pub fn round2(coef: f64) -> f64 {
    (coef * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Interaction channel
// ---------------------------------------------------------------------------

/// Current hover state: at most one live cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum HoverState {
    #[default]
    Idle,
    Hovering(InteractionCell),
}

/// One-directional, last-write-wins hover notification channel.
///
/// Transitions: `Idle --enter--> Hovering`, `Hovering --enter--> Hovering`
/// (a later cell supersedes, no intermediate leave), `Hovering --leave-->
/// Idle`. The listener receives `Some(cell)` on each distinct enter and
/// `None` on leave; re-entering the current cell emits nothing.
pub struct HoverChannel {
    state: HoverState,
    listener: Box<dyn FnMut(Option<&InteractionCell>)>,
}

impl Default for HoverChannel {
    fn default() -> Self {
        HoverChannel::new(|_| {})
    }
}

impl HoverChannel {
    pub fn new(listener: impl FnMut(Option<&InteractionCell>) + 'static) -> Self {
        HoverChannel {
            state: HoverState::Idle,
            listener: Box::new(listener),
        }
    }

    /// Pointer entered `cell`.
    pub fn enter(&mut self, cell: InteractionCell) {
        if matches!(&self.state, HoverState::Hovering(current) if *current == cell) {
            return;
        }
        (self.listener)(Some(&cell));
        self.state = HoverState::Hovering(cell);
    }

    /// Pointer left the hovered cell (or the whole chart).
    pub fn leave(&mut self) {
        if matches!(self.state, HoverState::Idle) {
            return;
        }
        self.state = HoverState::Idle;
        (self.listener)(None);
    }

    /// The live cell, if any.
    pub fn current(&self) -> Option<&InteractionCell> {
        match &self.state {
            HoverState::Hovering(cell) => Some(cell),
            HoverState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn cell(x: &str, y: &str, value: Option<f64>) -> InteractionCell {
        InteractionCell {
            x_label: x.to_string(),
            y_label: y.to_string(),
            x_pos: 100.0,
            y_pos: 50.0,
            value,
        }
    }

    fn recording_channel() -> (HoverChannel, Rc<RefCell<Vec<Option<InteractionCell>>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let channel = HoverChannel::new(move |c| sink.borrow_mut().push(c.cloned()));
        (channel, events)
    }

    #[test]
    fn enter_then_leave_round_trip() {
        let (mut channel, events) = recording_channel();
        channel.enter(cell("age", "income", Some(round2(0.4567))));
        assert_eq!(channel.current().unwrap().value, Some(0.46));

        channel.leave();
        assert_eq!(channel.current(), None);

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].as_ref().unwrap().value, Some(0.46));
        assert_eq!(events[1], None);
    }

    #[test]
    fn later_cell_supersedes_without_intermediate_idle() {
        let (mut channel, events) = recording_channel();
        channel.enter(cell("a", "b", Some(0.1)));
        channel.enter(cell("a", "c", Some(0.2)));

        assert_eq!(channel.current().unwrap().y_label, "c");
        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.is_some()));
    }

    #[test]
    fn re_entering_the_same_cell_is_silent() {
        let (mut channel, events) = recording_channel();
        channel.enter(cell("a", "b", Some(0.1)));
        channel.enter(cell("a", "b", Some(0.1)));
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn leave_when_idle_is_silent() {
        let (mut channel, events) = recording_channel();
        channel.leave();
        assert!(events.borrow().is_empty());
        assert_eq!(channel.current(), None);
    }

    #[test]
    fn rounding_keeps_two_decimals() {
        assert_eq!(round2(0.4567), 0.46);
        assert_eq!(round2(-0.999), -1.0);
        assert_eq!(round2(0.005), 0.01);
        assert_eq!(round2(1.0), 1.0);
    }
}

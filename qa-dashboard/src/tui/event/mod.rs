use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use strum::EnumIter;

/// Turns terminal events into [`Action`]s
/// according to the current [`InputMode`].
#[derive(Debug, Default, PartialEq)]
pub struct EventProcessor {
    pub input_mode: InputMode,
}

impl EventProcessor {
    pub fn input_mode(&mut self, input_mode: InputMode) {
        self.input_mode = input_mode;
    }

    pub fn process(&self, event: Event) -> Action {
        match event {
            Event::FocusGained
            | Event::FocusLost
            | Event::Mouse(_)
            | Event::Resize(_, _) => Action::Nop,
            Event::Paste(text) => match self.input_mode {
                InputMode::Normal => Action::Nop,
                InputMode::Edit => Action::Paste(text),
            },
            Event::Key(key_event) => self.process_key_event(key_event),
        }
    }

    pub fn process_key_event(&self, event: KeyEvent) -> Action {
        if event.kind == KeyEventKind::Release {
            return Action::Nop;
        }

        match self.input_mode {
            InputMode::Normal => normal_action(event),
            InputMode::Edit => edit_action(event),
        }
    }
}

fn normal_action(event: KeyEvent) -> Action {
    match event.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('h') | KeyCode::Left => Action::Left,
        KeyCode::Char('l') | KeyCode::Right => Action::Right,
        KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => Action::Up,
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => Action::Down,
        KeyCode::Char('1') => Action::Tab(0),
        KeyCode::Char('2') => Action::Tab(1),
        KeyCode::Char('e') => Action::Edit,
        KeyCode::Char('a') => Action::AddCategory,
        KeyCode::Char('s') => Action::Submit,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Enter => Action::Enter,
        KeyCode::Esc => Action::Escape,
        _ => Action::Nop,
    }
}

fn edit_action(event: KeyEvent) -> Action {
    let control = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = event.modifiers.contains(KeyModifiers::ALT);

    match event.code {
        KeyCode::Enter if alt => Action::Newline,
        KeyCode::Char('j') if control => Action::Newline,
        KeyCode::Enter => Action::Enter,
        KeyCode::Esc => Action::Escape,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Left if control => Action::LeftWord,
        KeyCode::Right if control => Action::RightWord,
        KeyCode::Left => Action::Left,
        KeyCode::Right => Action::Right,
        KeyCode::Home => Action::Beginning,
        KeyCode::End => Action::End,
        KeyCode::Char(c) if !control => Action::Unhandled(c),
        _ => Action::Nop,
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, EnumIter, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum InputMode {
    #[default]
    Normal,
    Edit,
}

#[derive(Debug, Clone, PartialEq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    Beginning,
    End,
    Left,
    Right,
    Up,
    Down,
    LeftWord,
    RightWord,
    /// Jump straight to a mode tab by index.
    Tab(usize),
    Edit,
    AddCategory,
    Submit,
    Refresh,
    Enter,
    Newline,
    Escape,
    Backspace,
    Quit,
    Unhandled(char),
    /// Bracketed paste, inserted as one block.
    Paste(String),
    Nop,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator as _;

    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[rstest]
    #[case(KeyCode::Char('q'), KeyModifiers::NONE, Action::Quit)]
    #[case(KeyCode::Char('c'), KeyModifiers::CONTROL, Action::Quit)]
    #[case(KeyCode::Char('l'), KeyModifiers::NONE, Action::Right)]
    #[case(KeyCode::Tab, KeyModifiers::NONE, Action::Down)]
    #[case(KeyCode::BackTab, KeyModifiers::SHIFT, Action::Up)]
    #[case(KeyCode::Char('2'), KeyModifiers::NONE, Action::Tab(1))]
    #[case(KeyCode::Char('s'), KeyModifiers::NONE, Action::Submit)]
    #[case(KeyCode::Char('x'), KeyModifiers::NONE, Action::Nop)]
    fn normal_mode_keys(
        #[case] code: KeyCode,
        #[case] modifiers: KeyModifiers,
        #[case] expected: Action,
    ) {
        let processor = EventProcessor::default();

        assert_eq!(processor.process(key(code, modifiers)), expected);
    }

    #[rstest]
    #[case(KeyCode::Char('q'), KeyModifiers::NONE, Action::Unhandled('q'))]
    #[case(KeyCode::Char('Q'), KeyModifiers::SHIFT, Action::Unhandled('Q'))]
    #[case(KeyCode::Enter, KeyModifiers::NONE, Action::Enter)]
    #[case(KeyCode::Enter, KeyModifiers::ALT, Action::Newline)]
    #[case(KeyCode::Char('j'), KeyModifiers::CONTROL, Action::Newline)]
    #[case(KeyCode::Left, KeyModifiers::CONTROL, Action::LeftWord)]
    #[case(KeyCode::Home, KeyModifiers::NONE, Action::Beginning)]
    fn edit_mode_keys(
        #[case] code: KeyCode,
        #[case] modifiers: KeyModifiers,
        #[case] expected: Action,
    ) {
        let mut processor = EventProcessor::default();
        processor.input_mode(InputMode::Edit);

        assert_eq!(processor.process(key(code, modifiers)), expected);
    }

    #[test]
    fn releases_and_resizes_are_ignored() {
        let processor = EventProcessor::default();
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;

        assert_eq!(processor.process(Event::Key(release)), Action::Nop);
        assert_eq!(processor.process(Event::Resize(80, 24)), Action::Nop);
    }

    #[rstest]
    #[case(InputMode::Edit, Action::Paste("line one\nq".into()))]
    #[case(InputMode::Normal, Action::Nop)]
    fn paste_only_while_editing(#[case] input_mode: InputMode, #[case] expected: Action) {
        let processor = EventProcessor { input_mode };

        assert_eq!(
            processor.process(Event::Paste("line one\nq".into())),
            expected
        );
    }

    #[test]
    fn every_mode_has_an_escape_hatch() {
        for input_mode in InputMode::iter() {
            let processor = EventProcessor { input_mode };
            let action = processor.process(key(KeyCode::Esc, KeyModifiers::NONE));
            assert_eq!(action, Action::Escape, "{input_mode}");
        }
    }
}

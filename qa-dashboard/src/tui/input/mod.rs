use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use super::event::Action;

/// An editable text field.
/// The cursor is counted in chars, not bytes.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct TextInputViewModel {
    input: String,
    cursor_position: usize,
    multiline: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextInputEvent {
    /// Editing is over, hand control back.
    Done,
}

impl TextInputViewModel {
    pub fn multiline() -> Self {
        TextInputViewModel {
            multiline: true,
            ..Default::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.input
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    pub fn handle_action(&mut self, action: Action) -> Option<TextInputEvent> {
        match action {
            Action::Enter | Action::Escape => return Some(TextInputEvent::Done),
            Action::Newline if self.multiline => self.enter_char('\n'),
            Action::Right => self.move_cursor_to(self.cursor_position.saturating_add(1)),
            Action::Left => self.move_cursor_to(self.cursor_position.saturating_sub(1)),
            Action::Beginning => self.move_cursor_to(0),
            Action::End => self.move_cursor_to(self.char_count()),
            Action::RightWord => {
                self.move_cursor_to(next_word(&self.chars(), self.cursor_position))
            }
            Action::LeftWord => {
                self.move_cursor_to(previous_word(&self.chars(), self.cursor_position))
            }
            Action::Backspace => self.delete_char(),
            Action::Unhandled(to_insert) => self.enter_char(to_insert),
            Action::Paste(text) => self.enter_str(&text),
            _ => {}
        }
        None
    }

    fn chars(&self) -> Vec<char> {
        self.input.chars().collect()
    }

    fn char_count(&self) -> usize {
        self.input.chars().count()
    }

    fn move_cursor_to(&mut self, new_position: usize) {
        self.cursor_position = new_position.min(self.char_count());
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor_position)
            .unwrap_or(self.input.len())
    }

    fn enter_char(&mut self, new_char: char) {
        let index = self.byte_index();
        self.input.insert(index, new_char);
        self.move_cursor_to(self.cursor_position + 1);
    }

    /// Line breaks become `\n`, single-line inputs drop them.
    fn enter_str(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let text: String = normalized
            .chars()
            .filter(|c| self.multiline || *c != '\n')
            .collect();

        let index = self.byte_index();
        self.input.insert_str(index, &text);
        self.move_cursor_to(self.cursor_position + text.chars().count());
    }

    fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }

        self.move_cursor_to(self.cursor_position - 1);
        let index = self.byte_index();
        self.input.remove(index);
    }
}

/// Position just past the next space, or the end of input.
fn next_word(chars: &[char], cursor_position: usize) -> usize {
    chars
        .iter()
        .enumerate()
        .skip(cursor_position)
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, _)| i + 1)
        .unwrap_or(chars.len())
}

/// Start of the word left of the cursor.
fn previous_word(chars: &[char], cursor_position: usize) -> usize {
    let before = &chars[..cursor_position.min(chars.len())];
    let word_end = before
        .iter()
        .rposition(|c| !c.is_whitespace())
        .map(|i| i + 1)
        .unwrap_or(0);
    before[..word_end]
        .iter()
        .rposition(|c| c.is_whitespace())
        .map(|i| i + 1)
        .unwrap_or(0)
}

#[derive(Debug, PartialEq, Clone)]
struct CursorLine<'a> {
    cursor_char: char,
    left: &'a str,
    right: &'a str,
}

/// Single out the char under the cursor for highlighting.
fn single_out(line: &str, cursor_position: usize) -> CursorLine<'_> {
    let split = line
        .char_indices()
        .nth(cursor_position)
        .map(|(i, c)| (i, c, i + c.len_utf8()));

    match split {
        Some((start, cursor_char, end)) => CursorLine {
            cursor_char,
            left: &line[..start],
            right: &line[end..],
        },
        None => CursorLine {
            cursor_char: ' ',
            left: line,
            right: "",
        },
    }
}

/// Lines of `input` plus the (line, column) of the cursor, if shown.
fn edit_lines(input: &str, cursor_position: Option<usize>) -> (Vec<Line<'_>>, (usize, usize)) {
    let cursor_style = Style::default().bg(Color::White).fg(Color::Black);
    let mut consumed_chars = 0;
    let mut cursor_at = (0, 0);

    let lines = input
        .split('\n')
        .enumerate()
        .map(|(index, line)| {
            let start = consumed_chars;
            let len = line.chars().count();
            consumed_chars += len + 1;

            match cursor_position {
                Some(cursor) if cursor >= start && cursor <= start + len => {
                    cursor_at = (index, cursor - start);
                    let cursor_line = single_out(line, cursor - start);
                    Line::from(vec![
                        Span::raw(cursor_line.left),
                        Span::styled(cursor_line.cursor_char.to_string(), cursor_style),
                        Span::raw(cursor_line.right),
                    ])
                }
                _ => Line::raw(line),
            }
        })
        .collect();

    (lines, cursor_at)
}

#[extend::ext(name = InputView)]
pub impl<'a> Frame<'a> {
    fn input_view(
        &mut self,
        parent: Rect,
        style: Style,
        title: &str,
        view_model: &TextInputViewModel,
        editing: bool,
    ) {
        let cursor = editing.then_some(view_model.cursor_position());
        let (lines, (row, column)) = edit_lines(view_model.value(), cursor);

        let inner_height = parent.height.saturating_sub(2) as usize;
        let inner_width = parent.width.saturating_sub(2) as usize;
        let scroll_y = row.saturating_sub(inner_height.saturating_sub(1));
        let scroll_x = column.saturating_sub(inner_width.saturating_sub(1));

        let input = Paragraph::new(lines)
            .scroll((
                u16::try_from(scroll_y).unwrap_or(u16::MAX),
                u16::try_from(scroll_x).unwrap_or(u16::MAX),
            ))
            .style(style)
            .block(Block::bordered().title(title.to_string()));

        self.render_widget(input, parent);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn type_str(view_model: &mut TextInputViewModel, text: &str) {
        for c in text.chars() {
            view_model.handle_action(Action::Unhandled(c));
        }
    }

    #[test]
    fn test_split_cursor() {
        let line = "let there be light!";

        let expected = CursorLine {
            cursor_char: 't',
            left: "let ",
            right: "here be light!",
        };

        assert_eq!(single_out(line, 4), expected);
    }

    #[test]
    fn test_split_cursor_end_of_line() {
        let line = "here:";

        let expected = CursorLine {
            cursor_char: ' ',
            left: line,
            right: "",
        };

        assert_eq!(single_out(line, 5), expected);
    }

    #[test]
    fn test_split_cursor_multibyte() {
        let expected = CursorLine {
            cursor_char: 'é',
            left: "caf",
            right: "!",
        };

        assert_eq!(single_out("café!", 3), expected);
    }

    #[test]
    fn typing_and_backspace() {
        let mut view_model = TextInputViewModel::default();

        type_str(&mut view_model, "spamm");
        view_model.handle_action(Action::Backspace);

        assert_eq!(view_model.value(), "spam");
        assert_eq!(view_model.cursor_position(), 4);
    }

    #[test]
    fn insert_in_the_middle_of_multibyte_text() {
        let mut view_model = TextInputViewModel::default();
        type_str(&mut view_model, "naïve");
        view_model.handle_action(Action::Beginning);
        view_model.handle_action(Action::Right);
        view_model.handle_action(Action::Right);
        view_model.handle_action(Action::Right);
        view_model.handle_action(Action::Backspace);
        type_str(&mut view_model, "i");

        assert_eq!(view_model.value(), "naive");
    }

    #[test]
    fn newline_only_in_multiline_inputs() {
        let mut single = TextInputViewModel::default();
        let mut multi = TextInputViewModel::multiline();

        for view_model in [&mut single, &mut multi] {
            type_str(view_model, "a");
            view_model.handle_action(Action::Newline);
            type_str(view_model, "b");
        }

        assert_eq!(single.value(), "ab");
        assert_eq!(multi.value(), "a\nb");
    }

    #[test]
    fn paste_inserts_at_cursor() {
        let mut view_model = TextInputViewModel::multiline();
        type_str(&mut view_model, "ad");
        view_model.handle_action(Action::Left);

        let event = view_model.handle_action(Action::Paste("b\r\nc".into()));

        assert_eq!(event, None);
        assert_eq!(view_model.value(), "ab\ncd");
        assert_eq!(view_model.cursor_position(), 4);
    }

    #[test]
    fn paste_into_single_line_drops_line_breaks() {
        let mut view_model = TextInputViewModel::default();

        view_model.handle_action(Action::Paste("spam\nham\r".into()));

        assert_eq!(view_model.value(), "spamham");
        assert_eq!(view_model.cursor_position(), 7);
    }

    #[test]
    fn enter_and_escape_finish_editing() {
        let mut view_model = TextInputViewModel::multiline();

        assert_eq!(
            view_model.handle_action(Action::Enter),
            Some(TextInputEvent::Done)
        );
        assert_eq!(
            view_model.handle_action(Action::Escape),
            Some(TextInputEvent::Done)
        );
        assert!(view_model.is_empty());
    }

    #[test]
    fn test_move_word() {
        let line: Vec<char> = "hello, world! i am here.".chars().collect();

        assert_eq!(next_word(&line, 0), 7);
        assert_eq!(next_word(&line, 7), 14);
        assert_eq!(previous_word(&line, 14), 7);
        assert_eq!(previous_word(&line, 7), 0);
    }

    #[test]
    fn cursor_lands_on_second_line() {
        let (lines, cursor_at) = edit_lines("ab\ncd", Some(4));

        assert_eq!(lines.len(), 2);
        assert_eq!(cursor_at, (1, 1));
    }
}

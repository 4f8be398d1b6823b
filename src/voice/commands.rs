//! Voice and text command table
//!
//! Recognized input is checked against a prioritized list of rules before
//! being appended to the pending input; a match is consumed and never
//! echoed into the text box. Rules are evaluated in order, so earlier
//! entries win, and the table is open to extension without touching the
//! recognizer.

/// What a matched command should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    /// Enter continuous listening mode (text input only).
    StartContinuous,
    CameraOn,
    CameraOff,
    ScreenShareOn,
    OpenTerminal,
    /// Send the pending input immediately.
    SendNow,
}

/// Where the input came from; some commands are text-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Text,
    Voice,
}

/// One prioritized rule: a set of exact phrases mapping to an action.
#[derive(Debug, Clone)]
pub struct CommandRule {
    pub action: CommandAction,
    pub phrases: &'static [&'static str],
    pub text_only: bool,
}

impl CommandRule {
    fn matches(&self, normalized: &str, source: InputSource) -> bool {
        if self.text_only && source != InputSource::Text {
            return false;
        }
        self.phrases.iter().any(|p| *p == normalized)
    }
}

/// Ordered command table.
#[derive(Debug, Clone)]
pub struct CommandTable {
    rules: Vec<CommandRule>,
}

impl Default for CommandTable {
    fn default() -> Self {
        Self {
            rules: vec![
                CommandRule {
                    action: CommandAction::StartContinuous,
                    phrases: &[
                        "iniciar",
                        "activar voz",
                        "modo continuo",
                        "start",
                        "start listening",
                        "continuous mode",
                    ],
                    text_only: true,
                },
                CommandRule {
                    action: CommandAction::CameraOn,
                    phrases: &[
                        "cámara",
                        "camara",
                        "activar cámara",
                        "prender cámara",
                        "camera",
                        "camera on",
                    ],
                    text_only: false,
                },
                CommandRule {
                    action: CommandAction::CameraOff,
                    phrases: &["apagar cámara", "detener cámara", "camera off"],
                    text_only: false,
                },
                CommandRule {
                    action: CommandAction::ScreenShareOn,
                    phrases: &["pantalla", "compartir pantalla", "screen", "share screen"],
                    text_only: false,
                },
                CommandRule {
                    action: CommandAction::OpenTerminal,
                    phrases: &["terminal", "abrir terminal", "open terminal"],
                    text_only: false,
                },
                CommandRule {
                    action: CommandAction::SendNow,
                    phrases: &["enviar", "enviar mensaje", "send", "send message"],
                    text_only: false,
                },
            ],
        }
    }
}

impl CommandTable {
    /// Match an utterance against the table. Returns the first matching
    /// rule's action, or None if the input is ordinary text.
    pub fn match_input(&self, input: &str, source: InputSource) -> Option<CommandAction> {
        let normalized = normalize(input);
        if normalized.is_empty() {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| rule.matches(&normalized, source))
            .map(|rule| rule.action)
    }

    /// Append a rule at the end of the priority order.
    pub fn push_rule(&mut self, rule: CommandRule) {
        self.rules.push(rule);
    }
}

/// Lowercase, trim, and drop the punctuation recognizers like to append.
fn normalize(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | '!'))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CommandTable {
        CommandTable::default()
    }

    #[test]
    fn test_camera_phrases_match() {
        assert_eq!(
            table().match_input("cámara", InputSource::Voice),
            Some(CommandAction::CameraOn)
        );
        assert_eq!(
            table().match_input("Cámara.", InputSource::Voice),
            Some(CommandAction::CameraOn)
        );
        assert_eq!(
            table().match_input("apagar cámara", InputSource::Voice),
            Some(CommandAction::CameraOff)
        );
    }

    #[test]
    fn test_normalization_strips_punctuation_and_case() {
        assert_eq!(
            table().match_input("  ENVIAR! ", InputSource::Voice),
            Some(CommandAction::SendNow)
        );
        assert_eq!(
            table().match_input("Terminal,", InputSource::Text),
            Some(CommandAction::OpenTerminal)
        );
    }

    #[test]
    fn test_start_continuous_is_text_only() {
        assert_eq!(
            table().match_input("iniciar", InputSource::Text),
            Some(CommandAction::StartContinuous)
        );
        assert_eq!(table().match_input("iniciar", InputSource::Voice), None);
    }

    #[test]
    fn test_ordinary_text_does_not_match() {
        assert_eq!(table().match_input("hola mundo", InputSource::Voice), None);
        assert_eq!(table().match_input("enviar el informe", InputSource::Voice), None);
        assert_eq!(table().match_input("", InputSource::Voice), None);
    }

    #[test]
    fn test_rules_evaluate_in_order() {
        let mut table = CommandTable::default();
        // A later rule reusing an existing phrase never wins.
        table.push_rule(CommandRule {
            action: CommandAction::OpenTerminal,
            phrases: &["enviar"],
            text_only: false,
        });
        assert_eq!(
            table.match_input("enviar", InputSource::Voice),
            Some(CommandAction::SendNow)
        );
    }

    #[test]
    fn test_table_is_extensible() {
        let mut table = CommandTable::default();
        table.push_rule(CommandRule {
            action: CommandAction::ScreenShareOn,
            phrases: &["proyectar"],
            text_only: false,
        });
        assert_eq!(
            table.match_input("proyectar", InputSource::Voice),
            Some(CommandAction::ScreenShareOn)
        );
    }
}

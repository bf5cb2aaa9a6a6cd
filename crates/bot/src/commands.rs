/// Admin directives carried over the direct-message channel, `$`-prefixed
/// so they can never collide with a sincere robot request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    /// Reload the catalog from disk.
    ReloadRobots,
    /// Reload the greeting/intro phrase files.
    ReloadPhrases,
    /// Finish the current loop iteration and shut down.
    Stop,
    /// `$`-prefixed but not a known verb; answered with a hint.
    Unknown,
}

/// `None` when the text is not a command at all, which makes it a regular
/// query even from an admin.
pub fn parse_admin_command(text: &str) -> Option<AdminCommand> {
    let rest = text.strip_prefix('$')?;
    Some(match rest.trim() {
        "ldrobots" => AdminCommand::ReloadRobots,
        "ldphrases" => AdminCommand::ReloadPhrases,
        "stop" => AdminCommand::Stop,
        _ => AdminCommand::Unknown,
    })
}

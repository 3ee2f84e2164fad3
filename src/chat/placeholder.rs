//! `%player%` / `%message%` substitution.

/// Token replaced by the sender's display name.
pub const PLAYER_TOKEN: &str = "%player%";

/// Token replaced by the chat message.
pub const MESSAGE_TOKEN: &str = "%message%";

/// Substitute the sender name and message into `template`.
///
/// Tokens are only recognized in the template itself. Text coming from
/// `player` or `message` is inserted verbatim, even if it contains a token.
pub fn substitute(template: &str, player: &str, message: &str) -> String {
    template
        .split(PLAYER_TOKEN)
        .map(|piece| piece.replace(MESSAGE_TOKEN, message))
        .collect::<Vec<_>>()
        .join(player)
}

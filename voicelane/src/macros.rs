/// Creates a single chat [`Message`](crate::Message) from a role shorthand.
///
/// ```rust
/// use voicelane::{Role, vl_msg};
///
/// let message = vl_msg!(assistant => "Turning left in 200 feet.");
/// assert_eq!(message.role, Role::Assistant);
/// assert_eq!(message.content, "Turning left in 200 feet.");
/// ```
#[macro_export]
macro_rules! vl_msg {
    (system => $content:expr $(,)?) => {
        $crate::Message::system($content)
    };
    (user => $content:expr $(,)?) => {
        $crate::Message::user($content)
    };
    (assistant => $content:expr $(,)?) => {
        $crate::Message::assistant($content)
    };
    ($role:ident => $content:expr $(,)?) => {
        compile_error!("unsupported role: use system, user, or assistant");
    };
}

/// Creates a `Vec<Message>` from role/content pairs.
///
/// ```rust
/// use voicelane::{Role, vl_messages};
///
/// let history = vl_messages![
///     user => "What's the weather in Austin?",
///     assistant => "Sunny and 75 degrees.",
/// ];
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history[1].role, Role::Assistant);
/// ```
#[macro_export]
macro_rules! vl_messages {
    () => {
        Vec::<$crate::Message>::new()
    };
    ($($role:ident => $content:expr),+ $(,)?) => {
        vec![$($crate::vl_msg!($role => $content)),+]
    };
}

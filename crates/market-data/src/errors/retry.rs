/// Classification for retry policy.
///
/// Used to determine how the fetch loop should respond to errors from the
/// quote provider.
///
/// # Behavior Summary
///
/// | Class | Rotate To Next Key? | Counts As An Attempt? |
/// |-------|---------------------|-----------------------|
/// | `Never` | No | n/a (the call ends) |
/// | `NextKey` | Yes | Yes |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - the failure is a property of the symbol or the payload,
    /// not of the credential. A different key cannot change the answer, so
    /// rotating on it would only burn quota and hide the real problem.
    Never,

    /// Rotate the credential cursor and try again with the next key.
    ///
    /// Used for rate limiting and transient transport failures, which are
    /// tied to the key (quota) or the moment (network), not the request.
    /// The call keeps rotating until a key succeeds or every key has been
    /// tried once.
    NextKey,
}

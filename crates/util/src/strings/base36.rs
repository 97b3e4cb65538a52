const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Format an unsigned integer in lowercase base 36.
///
/// # Examples
///
/// ```
/// use calendrift_util::strings::to_base36;
///
/// assert_eq!(to_base36(0), "0");
/// assert_eq!(to_base36(35), "z");
/// assert_eq!(to_base36(36), "10");
/// ```
pub fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::with_capacity(13);
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    buf.into_iter().map(char::from).collect()
}

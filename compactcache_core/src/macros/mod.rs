//! Testing and assertion macros

/// Asserts that the string representation of an expression matches a wildcard pattern.
///
/// The calling crate needs `wildmatch` as a (dev-)dependency.
///
/// # Example
/// ```
/// use compactcache_core::assert_wildcard;
/// let value = "R0000C0600.bundlx";
/// assert_wildcard!(value, "R*C0600.bundl?");
/// ```
#[macro_export]
macro_rules! assert_wildcard {
	($expression:expr, $wildcard:expr) => {
		let expression = format!("{}", $expression);
		if !wildmatch::WildMatch::new($wildcard).matches(&expression) {
			panic!(
				"assertion failed: expression \"{expression:?}\" does not match wildcard \"{}\"",
				$wildcard
			)
		}
	};
}

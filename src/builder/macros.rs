//! Macros for ergonomic markup construction.

/// Build a `Vec<TransitionMarkup>` from `trigger: source => dest` entries.
///
/// Internal transitions are written `trigger: source => _`.
///
/// # Example
///
/// ```
/// use stategraph::transitions;
///
/// let transitions = transitions! {
///     walk: "A" => "B",
///     run: "B" => "C",
///     tick: "C" => _,
/// };
///
/// assert_eq!(transitions.len(), 3);
/// assert_eq!(transitions[0].trigger, "walk");
/// assert!(transitions[2].is_internal());
/// ```
#[macro_export]
macro_rules! transitions {
    (@one $trigger:ident, $source:expr, _) => {
        $crate::core::TransitionMarkup::internal(stringify!($trigger), $source)
    };
    (@one $trigger:ident, $source:expr, $dest:expr) => {
        $crate::core::TransitionMarkup::new(stringify!($trigger), $source, $dest)
    };
    ($($trigger:ident : $source:expr => $dest:tt),* $(,)?) => {
        vec![$($crate::transitions!(@one $trigger, $source, $dest)),*]
    };
}

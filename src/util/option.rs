pub(crate) trait OptionExtension<T> {
    /// Acts similarly to [`Option::unwrap`] but with [`unreachable!`] in the none branch.
    ///
    /// Used for links that the table's structural invariants guarantee to be present, such as the
    /// right child of a node being rotated left. Reaching the none branch means the table itself is
    /// corrupt, not that the caller provided bad input.
    fn unreachable(self) -> T;
}

impl<T> OptionExtension<T> for Option<T> {
    #[track_caller]
    fn unreachable(self) -> T {
        match self {
            Some(val) => val,
            None => unreachable!("structural invariant violated: missing link"),
        }
    }
}

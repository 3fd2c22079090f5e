//! Reordering helpers for fallback chains (priority lists).

/// Swaps the element at `index` with the one before it. Moving the first
/// element up, or indexing past the end, is a no-op. Returns whether the
/// list changed.
pub fn move_up<T>(items: &mut [T], index: usize) -> bool {
    if index == 0 || index >= items.len() {
        return false;
    }
    items.swap(index, index - 1);
    true
}

/// Swaps the element at `index` with the one after it. Moving the last
/// element down, or indexing past the end, is a no-op. Returns whether the
/// list changed.
pub fn move_down<T>(items: &mut [T], index: usize) -> bool {
    if items.len() < 2 || index >= items.len() - 1 {
        return false;
    }
    items.swap(index, index + 1);
    true
}

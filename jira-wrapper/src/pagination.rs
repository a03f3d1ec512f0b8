//! Offset/limit page planning shared by the paged endpoints.

/// Split `limit` items into `(start_at, max_results)` windows of at most
/// `page_size`, in ascending offset order. The final window only asks for the
/// remainder.
pub(crate) fn page_windows(limit: u64, page_size: u64) -> Vec<(u64, u64)> {
  if page_size == 0 {
    return Vec::new();
  }
  (0..limit)
    .step_by(page_size as usize)
    .map(|start_at| (start_at, page_size.min(limit - start_at)))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_page_windows_partial_last_page() {
    assert_eq!(page_windows(250, 100), vec![(0, 100), (100, 100), (200, 50)]);
  }

  #[test]
  fn test_page_windows_exact_multiple() {
    assert_eq!(page_windows(100, 50), vec![(0, 50), (50, 50)]);
  }

  #[test]
  fn test_page_windows_small_and_empty() {
    assert_eq!(page_windows(7, 50), vec![(0, 7)]);
    assert!(page_windows(0, 50).is_empty());
    assert!(page_windows(10, 0).is_empty());
  }
}

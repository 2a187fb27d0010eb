//! Parallel/sequential execution helpers.
//!
//! The `cfg` logic lives here in one place so call sites in the generators
//! and the forest trainer stay clean. With the `rayon` feature the helpers
//! use rayon's parallel iterators; otherwise they fall back to standard
//! iterators. Every path preserves input order.
//!
//! Every helper takes `force_sequential`, which disables rayon at runtime even
//! when the feature is compiled in.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Map a function over a slice, potentially in parallel.
///
/// Results are in input order.
#[inline]
pub fn map_slice<T, F, R>(slice: &[T], f: F, force_sequential: bool) -> Vec<R>
where
    T: Sync,
    F: Fn(&T) -> R + Sync + Send,
    R: Send,
{
    #[cfg(feature = "rayon")]
    {
        if force_sequential {
            slice.iter().map(f).collect()
        } else {
            slice.par_iter().map(f).collect()
        }
    }

    #[cfg(not(feature = "rayon"))]
    {
        let _ = force_sequential;
        slice.iter().map(f).collect()
    }
}

/// Run a fallible per-entity walk and concatenate the rows in input order.
///
/// Stops at the first error in input order.
pub fn try_flat_map<T, F, R, E>(slice: &[T], f: F, force_sequential: bool) -> Result<Vec<R>, E>
where
    T: Sync,
    F: Fn(&T) -> Result<Vec<R>, E> + Sync + Send,
    R: Send,
    E: Send,
{
    let per_entity = map_slice(slice, f, force_sequential);
    let capacity = per_entity
        .iter()
        .map(|r| r.as_ref().map_or(0, Vec::len))
        .sum();
    let mut rows = Vec::with_capacity(capacity);
    for entity_rows in per_entity {
        rows.extend(entity_rows?);
    }
    Ok(rows)
}

/// Map a function over `0..n`, potentially in parallel.
///
/// Results are in index order.
#[inline]
pub fn map_indices<F, R>(n: usize, f: F, force_sequential: bool) -> Vec<R>
where
    F: Fn(usize) -> R + Sync + Send,
    R: Send,
{
    #[cfg(feature = "rayon")]
    {
        if force_sequential {
            (0..n).map(f).collect()
        } else {
            (0..n).into_par_iter().map(f).collect()
        }
    }

    #[cfg(not(feature = "rayon"))]
    {
        let _ = force_sequential;
        (0..n).map(f).collect()
    }
}

pub mod region;

pub use region::Region;

/// Rewrite `s` line by line. Shorthand for
/// `Region::from_str(s).map_lines(f).apply()`.
pub fn process_lines<F>(s: &str, f: F) -> String
where
    F: FnMut(usize, &str) -> String,
{
    Region::from_str(s).map_lines(f).apply()
}

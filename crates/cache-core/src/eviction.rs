//! Eviction planning
//!
//! Pure functions choosing what to delete; callers do the deleting.

use std::path::PathBuf;
use std::time::SystemTime;

/// Pick the least-recently-accessed share of `candidates`
///
/// Candidates are `(key, last_access)` pairs. The sort is stable, so ties
/// keep the order the caller enumerated them in. At least one candidate is
/// chosen when any exist.
pub fn lru_victims<K, T>(mut candidates: Vec<(K, T)>, fraction: f64) -> Vec<K>
where
    T: Ord,
{
    if candidates.is_empty() {
        return Vec::new();
    }

    let count = ((candidates.len() as f64 * fraction).floor() as usize)
        .max(1)
        .min(candidates.len());

    candidates.sort_by(|a, b| a.1.cmp(&b.1));
    candidates.into_iter().take(count).map(|(k, _)| k).collect()
}

/// A file considered for size-based eviction
#[derive(Debug, Clone)]
pub struct FileUsage {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
}

/// Pick the oldest files to delete once `files` exceed `max_size`
///
/// Returns nothing while the total is within `max_size`. Otherwise files go
/// oldest-modified first until the remainder is at or below
/// `max_size * low_water_ratio`.
pub fn size_victims(mut files: Vec<FileUsage>, max_size: u64, low_water_ratio: f64) -> Vec<PathBuf> {
    let total: u64 = files.iter().map(|f| f.size).sum();
    if total <= max_size {
        return Vec::new();
    }

    let low_water = (max_size as f64 * low_water_ratio) as u64;
    files.sort_by(|a, b| a.modified.cmp(&b.modified));

    let mut remaining = total;
    let mut victims = Vec::new();
    for file in files {
        if remaining <= low_water {
            break;
        }
        remaining = remaining.saturating_sub(file.size);
        victims.push(file.path);
    }
    victims
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn usage(name: &str, size: u64, age_secs: u64) -> FileUsage {
        FileUsage {
            path: PathBuf::from(name),
            size,
            modified: SystemTime::UNIX_EPOCH + Duration::from_secs(10_000 - age_secs),
        }
    }

    #[test]
    fn test_lru_victims_takes_oldest_fifth() {
        let candidates: Vec<(u32, u32)> = (0..100).map(|i| (i, 1000 - i)).collect();
        let victims = lru_victims(candidates, 0.2);

        assert_eq!(victims.len(), 20);
        // Highest keys carry the lowest timestamps
        assert!(victims.iter().all(|k| *k >= 80));
    }

    #[test]
    fn test_lru_victims_minimum_one() {
        let victims = lru_victims(vec![("a", 3), ("b", 1), ("c", 2)], 0.2);
        assert_eq!(victims, vec!["b"]);
    }

    #[test]
    fn test_lru_victims_empty() {
        let victims: Vec<&str> = lru_victims(Vec::<(&str, u32)>::new(), 0.2);
        assert!(victims.is_empty());
    }

    #[test]
    fn test_lru_victims_ties_keep_input_order() {
        let victims = lru_victims(vec![("x", 1), ("y", 1), ("z", 1), ("w", 5), ("v", 5)], 0.4);
        assert_eq!(victims, vec!["x", "y"]);
    }

    #[test]
    fn test_size_victims_under_limit() {
        let files = vec![usage("a", 40, 3), usage("b", 60, 1)];
        assert!(size_victims(files, 100, 0.8).is_empty());
    }

    #[test]
    fn test_size_victims_down_to_low_water() {
        // total 130 > 100, must drop to <= 80
        let files = vec![
            usage("newest", 30, 1),
            usage("oldest", 30, 50),
            usage("middle", 40, 20),
            usage("older", 30, 30),
        ];
        let victims = size_victims(files, 100, 0.8);
        assert_eq!(victims, vec![PathBuf::from("oldest"), PathBuf::from("older")]);
    }

    #[test]
    fn test_size_victims_may_take_everything() {
        let files = vec![usage("a", 500, 2), usage("b", 600, 1)];
        let victims = size_victims(files, 100, 0.8);
        assert_eq!(victims, vec![PathBuf::from("a"), PathBuf::from("b")]);
    }
}

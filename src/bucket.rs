//! Deterministic hash buckets for synthesized attributes.
//!
//! The source data carries no department or faculty columns, so both
//! are derived from the course code. The derivation must give the same
//! answer on every run and in every implementation, so it is pinned to
//! a fixed algorithm:
//!
//! 1. Hash the UTF-8 bytes of `"{namespace}:{course}"` with SHA-256.
//! 2. Read the first 8 digest bytes as a big-endian `u64`.
//! 3. Reduce modulo the bucket count.
//!
//! The namespace keeps department and faculty assignments independent
//! of each other for the same course.

use sha2::{Digest, Sha256};

/// Namespace for department buckets.
pub const DEPARTMENT_NAMESPACE: &str = "department";
/// Namespace for faculty buckets.
pub const FACULTY_NAMESPACE: &str = "faculty";

/// Bucket index of `course` within `namespace`, in `0..buckets`.
///
/// Returns `None` when `buckets` is zero.
pub fn bucket(namespace: &str, course: &str, buckets: u32) -> Option<u32> {
    if buckets == 0 {
        return None;
    }
    let digest = Sha256::new()
        .chain_update(namespace.as_bytes())
        .chain_update(b":")
        .chain_update(course.as_bytes())
        .finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    Some((u64::from_be_bytes(head) % u64::from(buckets)) as u32)
}

/// Department name for a course, chosen from `departments`.
pub fn department_of<'a>(course: &str, departments: &'a [String]) -> Option<&'a str> {
    let index = bucket(DEPARTMENT_NAMESPACE, course, departments.len() as u32)?;
    departments.get(index as usize).map(String::as_str)
}

/// Synthetic faculty identity for a course, e.g. `"FAC-07"`.
pub fn faculty_of(course: &str, pool: u32) -> Option<String> {
    bucket(FACULTY_NAMESPACE, course, pool).map(|i| format!("FAC-{:02}", i + 1))
}

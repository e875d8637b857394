//! Classical predicates over n-bit integers.
//!
//! Two shapes exist: a [`MarkedSet`] (explicit membership, compiled by
//! visiting members only) and a [`TotalPredicate`] (a table over some inputs
//! plus a default for everything else, compiled by visiting the whole
//! domain). Both feed the oracle compiler through [`PredicateSource`].

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{OracleError, OracleResult};

/// Largest register width whose domain fits in `u64`.
pub const MAX_WIDTH: u32 = 63;

/// Check that `width` is a usable register width.
pub fn check_width(width: u32) -> OracleResult<()> {
    if width == 0 || width > MAX_WIDTH {
        return Err(OracleError::Configuration(format!(
            "register width must be in 1..={MAX_WIDTH}, got {width}"
        )));
    }
    Ok(())
}

/// Number of integers in the `width`-bit domain.
#[inline]
pub fn domain_size(width: u32) -> u64 {
    1u64 << width
}

/// Bits of `x` in its `width`-bit expansion, most significant first.
pub fn bits_msb_first(x: u64, width: u32) -> impl Iterator<Item = bool> {
    (0..width).rev().map(move |shift| (x >> shift) & 1 == 1)
}

fn in_domain(value: i64, width: u32) -> OracleResult<u64> {
    match u64::try_from(value) {
        Ok(v) if v < domain_size(width) => Ok(v),
        _ => Err(OracleError::Domain { value, width }),
    }
}

/// A set of distinct integers in `[0, 2^width)`.
///
/// Members are kept in ascending order so everything derived from the set
/// is deterministic. Duplicates collapse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedSet {
    width: u32,
    members: BTreeSet<u64>,
}

impl MarkedSet {
    /// Build a marked set bound to a register width.
    ///
    /// # Errors
    ///
    /// `Configuration` for a width outside `1..=63`, `Domain` for any member
    /// outside `[0, 2^width)`.
    pub fn new(width: u32, members: impl IntoIterator<Item = i64>) -> OracleResult<Self> {
        check_width(width)?;
        let members = members
            .into_iter()
            .map(|v| in_domain(v, width))
            .collect::<OracleResult<BTreeSet<_>>>()?;
        Ok(Self { width, members })
    }

    /// An empty set over `width` bits.
    pub fn empty(width: u32) -> OracleResult<Self> {
        Self::new(width, std::iter::empty())
    }

    /// Register width the set is bound to.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the set has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Check membership.
    pub fn contains(&self, x: u64) -> bool {
        self.members.contains(&x)
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.members.iter().copied()
    }
}

/// A total boolean function over `[0, 2^width)`.
///
/// Inputs listed in the table take their tabled value; every other input
/// takes `default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalPredicate {
    width: u32,
    table: BTreeMap<u64, bool>,
    default: bool,
}

impl TotalPredicate {
    /// Build a total predicate from explicit entries and a default.
    pub fn new(
        width: u32,
        table: impl IntoIterator<Item = (i64, bool)>,
        default: bool,
    ) -> OracleResult<Self> {
        check_width(width)?;
        let table = table
            .into_iter()
            .map(|(x, v)| in_domain(x, width).map(|x| (x, v)))
            .collect::<OracleResult<BTreeMap<_, _>>>()?;
        Ok(Self {
            width,
            table,
            default,
        })
    }

    /// Assemble from entries already known to lie in the domain.
    pub(crate) fn from_parts(width: u32, table: BTreeMap<u64, bool>, default: bool) -> Self {
        Self {
            width,
            table,
            default,
        }
    }

    /// A predicate with the same value everywhere.
    pub fn constant(width: u32, value: bool) -> OracleResult<Self> {
        Self::new(width, std::iter::empty(), value)
    }

    /// Register width of the domain.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Value taken outside the table.
    pub fn default_value(&self) -> bool {
        self.default
    }

    /// Evaluate the predicate.
    pub fn evaluate(&self, x: u64) -> OracleResult<bool> {
        if x >= domain_size(self.width) {
            return Err(OracleError::Domain {
                value: i64::try_from(x).unwrap_or(i64::MAX),
                width: self.width,
            });
        }
        Ok(self.value_at(x))
    }

    fn value_at(&self, x: u64) -> bool {
        self.table.get(&x).copied().unwrap_or(self.default)
    }

    /// Inputs on which the predicate is true, ascending.
    ///
    /// Visits the entire domain: O(2^width).
    pub fn ones(&self) -> impl Iterator<Item = u64> + '_ {
        (0..domain_size(self.width)).filter(|&x| self.value_at(x))
    }

    /// Number of inputs on which the predicate is true, without enumerating
    /// the domain.
    pub fn count_ones(&self) -> u64 {
        let tabled_ones = self.table.values().filter(|&&v| v).count() as u64;
        let untabled = domain_size(self.width) - self.table.len() as u64;
        tabled_ones + if self.default { untabled } else { 0 }
    }

    /// Check if the predicate takes one value on the whole domain.
    pub fn is_constant(&self) -> bool {
        let ones = self.count_ones();
        ones == 0 || ones == domain_size(self.width)
    }

    /// Check if exactly half of the domain maps to 1.
    pub fn is_balanced(&self) -> bool {
        self.count_ones() == domain_size(self.width) / 2
    }
}

/// What the oracle compiler marks.
#[derive(Debug, Clone, Copy)]
pub enum PredicateSource<'a> {
    /// Mark the members of a set. Cost O(|S|·n).
    Marked(&'a MarkedSet),
    /// Mark every input a total predicate maps to 1. Cost O(2^n·n).
    Total(&'a TotalPredicate),
}

impl<'a> PredicateSource<'a> {
    /// Bit width of the predicate.
    pub fn width(&self) -> u32 {
        match self {
            PredicateSource::Marked(set) => set.width(),
            PredicateSource::Total(predicate) => predicate.width(),
        }
    }

    /// Inputs to phase-flip, ascending.
    pub fn matching(&self) -> Box<dyn Iterator<Item = u64> + 'a> {
        match *self {
            PredicateSource::Marked(set) => Box::new(set.iter()),
            PredicateSource::Total(predicate) => Box::new(predicate.ones()),
        }
    }

    /// Check if the source enumerates the full domain.
    pub fn is_full_domain(&self) -> bool {
        matches!(self, PredicateSource::Total(_))
    }
}

impl<'a> From<&'a MarkedSet> for PredicateSource<'a> {
    fn from(set: &'a MarkedSet) -> Self {
        PredicateSource::Marked(set)
    }
}

impl<'a> From<&'a TotalPredicate> for PredicateSource<'a> {
    fn from(predicate: &'a TotalPredicate) -> Self {
        PredicateSource::Total(predicate)
    }
}

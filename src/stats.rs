//! Chain-length statistics of a table

/// Summary of how entries are spread across the buckets of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChainStats {
    /// Number of buckets (the table capacity)
    pub buckets: usize,
    /// Number of stored entries
    pub entries: usize,
    /// Buckets whose chain is empty
    pub empty_buckets: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Sum over all chains of `len * (len + 1) / 2`
    ///
    /// This is the total number of key comparisons needed to `find` every stored
    /// entry once, walking each chain from its head.
    pub total_probes: usize,
}

impl ChainStats {
    /// Builds the summary from one chain length per bucket
    #[must_use]
    pub fn from_chain_lengths(lengths: &[usize]) -> Self {
        lengths.iter().fold(Self { buckets: lengths.len(), ..Self::default() }, |mut stats, &len| {
            stats.entries = stats.entries.saturating_add(len);
            if len == 0 {
                stats.empty_buckets = stats.empty_buckets.saturating_add(1);
            }
            stats.longest_chain = stats.longest_chain.max(len);
            let probes = len.saturating_mul(len.saturating_add(1)) / 2;
            stats.total_probes = stats.total_probes.saturating_add(probes);
            stats
        })
    }

    /// Entries per bucket
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        if self.buckets == 0 {
            return 0.0;
        }
        self.entries as f64 / self.buckets as f64
    }

    /// Mean length of the non-empty chains
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn average_chain_length(&self) -> f64 {
        let occupied = self.buckets.saturating_sub(self.empty_buckets);
        if occupied == 0 {
            return 0.0;
        }
        self.entries as f64 / occupied as f64
    }

    /// Expected key comparisons for a successful `find` of a uniformly chosen entry
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn average_successful_probes(&self) -> f64 {
        if self.entries == 0 {
            return 0.0;
        }
        self.total_probes as f64 / self.entries as f64
    }
}

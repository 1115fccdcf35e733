//! Accuracy and latency aggregation.
//!
//! [`ResultsSummary::aggregate`] turns answered-question projections into
//! per-domain and overall statistics:
//!
//! - a record counts as correct only when expected answer and model response
//!   both normalize to the same letter
//! - `accuracy_pct` is `100 * correct / total`, and `0.0` for an empty domain
//! - `avg_response_time_ms` averages finite latencies and is `None` when no
//!   record carries one
//! - overall figures are sums and a record-weighted mean across domains
//! - `best_domain` / `slowest_domain` ignore domains without data; ties go to
//!   the domain encountered first

use crate::core::domain::Domain;
use crate::core::question::AnsweredRecord;
use serde::{Deserialize, Serialize};

/// Running sums shared by domain and overall figures
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Tally {
    total: usize,
    correct: usize,
    time_sum: f64,
    time_count: usize,
}

impl Tally {
    fn add(&mut self, record: &AnsweredRecord) {
        self.total += 1;
        if record.is_correct() {
            self.correct += 1;
        }
        if let Some(ms) = record.latency() {
            self.time_sum += ms;
            self.time_count += 1;
        }
    }

    fn merge(&mut self, other: &Tally) {
        self.total += other.total;
        self.correct += other.correct;
        self.time_sum += other.time_sum;
        self.time_count += other.time_count;
    }

    fn accuracy_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.correct as f64 / self.total as f64
        }
    }

    fn avg_response_time_ms(&self) -> Option<f64> {
        if self.time_count == 0 {
            None
        } else {
            Some(self.time_sum / self.time_count as f64)
        }
    }
}

/// Statistics for one domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainSummary {
    pub domain: Domain,
    pub total_questions: usize,
    pub total_correct: usize,
    pub accuracy_pct: f64,
    pub avg_response_time_ms: Option<f64>,
}

impl DomainSummary {
    /// Zero-filled summary for a domain without answered questions
    pub fn empty(domain: Domain) -> Self {
        Self::from_tally(domain, &Tally::default())
    }

    /// Summarize one domain's answered records
    pub fn from_records(domain: Domain, records: &[AnsweredRecord]) -> Self {
        let mut tally = Tally::default();
        for record in records {
            tally.add(record);
        }
        Self::from_tally(domain, &tally)
    }

    fn from_tally(domain: Domain, tally: &Tally) -> Self {
        Self {
            domain,
            total_questions: tally.total,
            total_correct: tally.correct,
            accuracy_pct: tally.accuracy_pct(),
            avg_response_time_ms: tally.avg_response_time_ms(),
        }
    }
}

/// Statistics across all summarized domains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallSummary {
    pub total_questions: usize,
    pub total_correct: usize,
    pub accuracy_pct: f64,
    pub avg_response_time_ms: Option<f64>,
    /// Highest accuracy among domains with at least one answered question
    pub best_domain: Option<Domain>,
    /// Highest average latency among domains with a defined average
    pub slowest_domain: Option<Domain>,
}

/// Complete aggregation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsSummary {
    pub domains: Vec<DomainSummary>,
    pub overall: OverallSummary,
}

impl ResultsSummary {
    /// Aggregate answered records grouped by domain.
    ///
    /// Domains appear in the output in the order given, which is also the
    /// tie-break order for best/slowest selection.
    pub fn aggregate<'a, I>(groups: I) -> Self
    where
        I: IntoIterator<Item = (Domain, &'a [AnsweredRecord])>,
    {
        let mut overall = Tally::default();
        let mut domains = Vec::new();

        for (domain, records) in groups {
            let mut tally = Tally::default();
            for record in records {
                tally.add(record);
            }
            overall.merge(&tally);
            domains.push(DomainSummary::from_tally(domain, &tally));
        }

        let best_domain = pick_max(
            domains
                .iter()
                .filter(|d| d.total_questions > 0)
                .map(|d| (d.domain, d.accuracy_pct)),
        );
        let slowest_domain = pick_max(
            domains
                .iter()
                .filter_map(|d| d.avg_response_time_ms.map(|ms| (d.domain, ms))),
        );

        Self {
            overall: OverallSummary {
                total_questions: overall.total,
                total_correct: overall.correct,
                accuracy_pct: overall.accuracy_pct(),
                avg_response_time_ms: overall.avg_response_time_ms(),
                best_domain,
                slowest_domain,
            },
            domains,
        }
    }

    /// Zero-filled summary over the given domains
    pub fn empty(domains: &[Domain]) -> Self {
        let no_records: &[AnsweredRecord] = &[];
        Self::aggregate(domains.iter().map(|d| (*d, no_records)))
    }

    /// Look up one domain's figures
    pub fn domain(&self, domain: Domain) -> Option<&DomainSummary> {
        self.domains.iter().find(|d| d.domain == domain)
    }
}

/// First domain with the strictly greatest value
fn pick_max(candidates: impl Iterator<Item = (Domain, f64)>) -> Option<Domain> {
    let mut best: Option<(Domain, f64)> = None;
    for (domain, value) in candidates {
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((domain, value)),
        }
    }
    best.map(|(domain, _)| domain)
}

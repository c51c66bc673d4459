//! Client-side lead pipeline: snapshot ordering, aggregate statistics,
//! free-text filtering and pagination.
//!
//! Everything here is pure bookkeeping over the in-memory snapshot of
//! the last fetch. Aggregates are recomputed from the snapshot on every
//! call rather than maintained incrementally, so a patched status is
//! reflected the next time the caller asks.

use crate::models::{Lead, LeadStatus};
use crate::timefmt;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Fixed page size of the lead list.
pub const PAGE_SIZE: usize = 10;

/// Aggregate counts and rates derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadStats {
    pub total: usize,
    /// QUALIFICADO plus QUALIFICADO_OP.
    pub qualified: usize,
    /// NOVO, including leads whose status slot is empty or absent.
    pub new: usize,
    pub contacted: usize,
    pub proposal: usize,
    pub closed: usize,
    /// Leads created in the last 24 hours.
    pub recent_24h: usize,
    /// Qualified over total, 1-decimal percentage string.
    pub qualification_rate: String,
    /// Closed over total, 1-decimal percentage string.
    pub conversion_rate: String,
    pub proposal_rate: String,
    /// Top entries by declared main interest.
    pub by_interest: Vec<BreakdownEntry>,
    /// Top entries by city (the `field01` slot on list payloads).
    pub by_city: Vec<BreakdownEntry>,
}

/// One row of a grouped breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub count: usize,
    /// Whole-number percentage string of the snapshot total.
    pub share: String,
}

/// One page of the filtered lead sequence.
#[derive(Debug)]
pub struct PageView<'a> {
    pub items: Vec<&'a Lead>,
    pub page: usize,
    pub total_pages: usize,
    pub total_filtered: usize,
}

/// In-memory snapshot of the lead collection for one tenant/product.
#[derive(Debug, Clone)]
pub struct LeadBoard {
    leads: Vec<Lead>,
}

impl LeadBoard {
    /// Builds a board from a freshly fetched collection.
    ///
    /// The snapshot is sorted by `createdAt` descending exactly once;
    /// this ordering is a display invariant and is never re-applied
    /// after filtering. Unparseable timestamps sort last.
    pub fn from_snapshot(mut leads: Vec<Lead>) -> Self {
        leads.sort_by(|a, b| {
            let ta = timefmt::parse_timestamp(&a.created_at);
            let tb = timefmt::parse_timestamp(&b.created_at);
            tb.cmp(&ta)
        });
        Self { leads }
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    /// Locates one lead by its stringified id.
    ///
    /// The remote service offers no single-record lookup, so the detail
    /// view resolves against the full snapshot; the path parameter is
    /// compared textually against the numeric id.
    pub fn find(&self, id_text: &str) -> Option<&Lead> {
        self.leads.iter().find(|l| l.id.to_string() == id_text)
    }

    /// Patches one lead's status slot after a successful remote update.
    ///
    /// Returns whether the id was present. No re-fetch happens; the
    /// snapshot stays otherwise untouched.
    pub fn apply_status(&mut self, id: i64, status: LeadStatus) -> bool {
        match self.leads.iter_mut().find(|l| l.id == id) {
            Some(lead) => {
                lead.field03 = Some(status.as_str().to_string());
                true
            }
            None => false,
        }
    }

    /// Aggregates the snapshot, evaluated now.
    pub fn stats(&self) -> LeadStats {
        self.stats_at(Utc::now())
    }

    /// Aggregates the snapshot against an explicit reference time.
    pub fn stats_at(&self, now: DateTime<Utc>) -> LeadStats {
        let total = self.leads.len();
        let count = |wanted: &[LeadStatus]| {
            self.leads
                .iter()
                .filter(|l| l.pipeline_status().is_some_and(|s| wanted.contains(&s)))
                .count()
        };

        let qualified = count(&[LeadStatus::Qualificado, LeadStatus::QualificadoOp]);
        let new = count(&[LeadStatus::Novo]);
        let contacted = count(&[LeadStatus::ContatoFeito]);
        let proposal = count(&[LeadStatus::Proposta]);
        let closed = count(&[LeadStatus::Fechado]);

        let recent_24h = self
            .leads
            .iter()
            .filter(|l| {
                timefmt::parse_timestamp(&l.created_at).is_some_and(|created| {
                    let elapsed = now.signed_duration_since(created);
                    elapsed >= Duration::zero() && elapsed <= Duration::hours(24)
                })
            })
            .count();

        LeadStats {
            total,
            qualified,
            new,
            contacted,
            proposal,
            closed,
            recent_24h,
            qualification_rate: rate(qualified, total),
            conversion_rate: rate(closed, total),
            proposal_rate: rate(proposal, total),
            by_interest: breakdown(&self.leads, total, |l| l.main_interest.as_deref()),
            by_city: breakdown(&self.leads, total, |l| l.field01.as_deref()),
        }
    }

    /// Applies the free-text search filter, preserving snapshot order.
    pub fn filtered(&self, term: &str) -> Vec<&Lead> {
        self.leads.iter().filter(|l| lead_matches(l, term)).collect()
    }

    /// One page of the filtered sequence.
    ///
    /// A requested page beyond the filtered page count resets to page 1
    /// (the filter just shrank under the cursor). Page numbers are
    /// 1-based; 0 is treated as 1.
    pub fn page(&self, term: &str, page: usize) -> PageView<'_> {
        let filtered = self.filtered(term);
        let total_filtered = filtered.len();
        let total_pages = total_filtered.div_ceil(PAGE_SIZE);

        let mut page = page.max(1);
        if page > total_pages {
            page = 1;
        }

        let start = (page - 1) * PAGE_SIZE;
        let items = filtered
            .into_iter()
            .skip(start)
            .take(PAGE_SIZE)
            .collect();

        PageView {
            items,
            page,
            total_pages,
            total_filtered,
        }
    }
}

/// Free-text match: case-insensitive substring over name, email and
/// main interest, raw substring over the phone (digits are not
/// case-foldable), OR-combined. The empty term matches everything.
pub fn lead_matches(lead: &Lead, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    let field_has = |field: &Option<String>| {
        field
            .as_deref()
            .is_some_and(|v| v.to_lowercase().contains(&needle))
    };

    field_has(&lead.name)
        || field_has(&lead.email)
        || lead
            .cell_phone
            .as_deref()
            .is_some_and(|phone| phone.contains(term))
        || field_has(&lead.main_interest)
}

/// Percentage of `count` over `total` as a 1-decimal string; an empty
/// snapshot yields "0" rather than dividing by zero.
pub fn rate(count: usize, total: usize) -> String {
    if total == 0 {
        return "0".to_string();
    }
    format!("{:.1}", count as f64 / total as f64 * 100.0)
}

fn breakdown<'a>(
    leads: &'a [Lead],
    total: usize,
    key: impl Fn(&'a Lead) -> Option<&'a str>,
) -> Vec<BreakdownEntry> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for lead in leads {
        let label = match key(lead) {
            Some(v) if !v.is_empty() => v,
            _ => "Não especificado",
        };
        *counts.entry(label).or_default() += 1;
    }

    let mut entries: Vec<(&str, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .take(5)
        .map(|(label, count)| BreakdownEntry {
            label: label.to_string(),
            count,
            share: if total == 0 {
                "0".to_string()
            } else {
                format!("{:.0}", count as f64 / total as f64 * 100.0)
            },
        })
        .collect()
}

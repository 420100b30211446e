// ABOUTME: Static status-transition matrix, the single source of truth
// ABOUTME: Maps (role, current status) to the set of statuses that role may move to

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

use aquaflow_core::{CustomerStatus, Role};

use CustomerStatus::*;

lazy_static! {
    /// Total over the full Role x CustomerStatus domain. Rows not inserted
    /// here resolve to the empty set, so an absent entry means "no move",
    /// never undefined behavior.
    static ref TRANSITIONS: HashMap<(Role, CustomerStatus), HashSet<CustomerStatus>> = {
        let mut m = HashMap::new();

        let mut insert = |role: Role, from: CustomerStatus, to: &[CustomerStatus]| {
            m.insert((role, from), to.iter().copied().collect::<HashSet<_>>());
        };

        // Salespeople own the lead-to-sale lane and lose write access at `sold`.
        insert(Role::Salesperson, NotHandled, &[NoAnswer, CallAgain, NotInterested, MeetingBooked]);
        insert(Role::Salesperson, NoAnswer, &[NoAnswer, CallAgain, NotInterested, MeetingBooked]);
        insert(Role::Salesperson, CallAgain, &[NoAnswer, NotInterested, MeetingBooked]);
        insert(Role::Salesperson, NotInterested, &[CallAgain, MeetingBooked]);
        insert(Role::Salesperson, MeetingBooked, &[NoAnswer, CallAgain, NotInterested, QuotationStage, ExtendedWaterTest]);
        insert(Role::Salesperson, QuotationStage, &[CallAgain, NotInterested, ExtendedWaterTest, Sold]);
        insert(Role::Salesperson, ExtendedWaterTest, &[NotInterested, QuotationStage, Sold]);

        // In-house staff own the post-sale administrative lane.
        insert(Role::Inhouse, NotInterested, &[Archived]);
        insert(Role::Inhouse, Sold, &[ReadyForInstallation]);
        insert(Role::Inhouse, ReadyForInstallation, &[Sold]);
        insert(Role::Inhouse, InstallationComplete, &[Archived]);

        // Installers only complete (or reopen) installations.
        insert(Role::Installer, ReadyForInstallation, &[InstallationComplete]);
        insert(Role::Installer, InstallationComplete, &[ReadyForInstallation]);

        // Admin: every status except the current one.
        for from in CustomerStatus::ALL {
            let to: Vec<CustomerStatus> = CustomerStatus::ALL
                .into_iter()
                .filter(|s| *s != from)
                .collect();
            insert(Role::Admin, from, &to);
        }

        m
    };

    static ref EMPTY: HashSet<CustomerStatus> = HashSet::new();
}

/// The statuses `role` may move a customer to from `current`. Total: every
/// (role, status) pair resolves to a set, possibly empty.
pub fn allowed_next_statuses(role: Role, current: CustomerStatus) -> &'static HashSet<CustomerStatus> {
    TRANSITIONS.get(&(role, current)).unwrap_or(&EMPTY)
}

/// Downstream team notified when a customer lands on a handoff status.
pub fn handoff_role(status: CustomerStatus) -> Option<Role> {
    match status {
        Sold => Some(Role::Inhouse),
        ReadyForInstallation => Some(Role::Installer),
        _ => None,
    }
}

//! Plain-text rendering of API responses for the terminal.

use std::fmt::Write as _;

use agrifusion_core::{
  filters::FarmerFilters,
  notification::{Notification, Priority},
  profile::{DashboardAccess, ProfileSummary},
};

// ─── Profile ──────────────────────────────────────────────────────────────────

pub fn profile(summary: &ProfileSummary) -> String {
  let p = &summary.profile;
  let access = match summary.access {
    DashboardAccess::Granted => "granted",
    DashboardAccess::AwaitingApproval => "awaiting approval",
    DashboardAccess::Rejected => "rejected",
    DashboardAccess::Suspended => "suspended",
  };

  let mut out = String::new();
  let _ = writeln!(out, "{}", p.full_name.as_deref().unwrap_or("(no name)"));
  let _ = writeln!(out, "  id:        {}", p.id);
  let _ = writeln!(out, "  role:      {}", p.role);
  let _ = writeln!(out, "  status:    {}", p.status);
  let _ = writeln!(out, "  dashboard: {access}");
  out
}

// ─── Filters ──────────────────────────────────────────────────────────────────

pub fn filters(filters: &FarmerFilters) -> String {
  let mut out = String::new();
  section(&mut out, "Districts", &filters.districts);
  section(&mut out, "States", &filters.states);
  section(&mut out, "Crops", &filters.crops);
  out
}

fn section(out: &mut String, title: &str, values: &[String]) {
  let _ = writeln!(out, "{title} ({})", values.len());
  if values.is_empty() {
    let _ = writeln!(out, "  (none)");
  }
  for value in values {
    let _ = writeln!(out, "  {value}");
  }
}

// ─── Notifications ────────────────────────────────────────────────────────────

pub fn notifications(notifications: &[Notification], unread: usize) -> String {
  let mut out = String::new();
  if notifications.is_empty() {
    let _ = writeln!(out, "No notifications.");
  }
  for n in notifications {
    let marker = if n.is_read { ' ' } else { '*' };
    let flag = match n.priority {
      Priority::High | Priority::Urgent => format!(" [{}]", n.priority.as_str()),
      Priority::Low | Priority::Normal => String::new(),
    };
    let _ = writeln!(
      out,
      "{marker} {id}  {when}  {kind}{flag}  {title}",
      id = n.id,
      when = n.created_at.format("%Y-%m-%d %H:%M"),
      kind = n.kind,
      title = n.title,
    );
  }
  let _ = writeln!(out, "{unread} unread");
  out
}

#[cfg(test)]
mod tests {
  use agrifusion_core::notification::NotificationType;
  use chrono::{TimeZone, Utc};
  use uuid::Uuid;

  use super::*;

  fn notification(title: &str, is_read: bool, priority: Priority) -> Notification {
    Notification {
      id: Uuid::nil(),
      recipient_id: Uuid::nil(),
      kind: NotificationType::Message,
      title: title.into(),
      message: String::new(),
      is_read,
      read_at: None,
      created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
      priority,
      category: None,
      metadata: None,
    }
  }

  #[test]
  fn unread_are_starred_and_urgent_is_flagged() {
    let list = [
      notification("Harvest window", false, Priority::Urgent),
      notification("Weekly digest", true, Priority::Normal),
    ];
    let text = notifications(&list, 1);
    let lines: Vec<&str> = text.lines().collect();

    assert!(lines[0].starts_with("* "));
    assert!(lines[0].contains("message [urgent]  Harvest window"));
    assert!(lines[1].starts_with("  "));
    assert!(!lines[1].contains('['));
    assert_eq!(lines[2], "1 unread");
  }

  #[test]
  fn empty_filter_sections_say_none() {
    let text = filters(&FarmerFilters {
      districts: vec!["Pune".into()],
      states:    vec![],
      crops:     vec![],
    });
    assert!(text.starts_with("Districts (1)\n  Pune\n"));
    assert!(text.contains("States (0)\n  (none)\n"));
  }
}

use dioxus::prelude::*;
use fedsim_sync_engine::{LedgerEntry, LinkState, UiSnapshot};

use crate::app::Tab;

pub mod charts;
pub mod pages;

/// Header with the console title and the backend link badge
#[component]
pub fn Header(link: LinkState) -> Element {
    let badge_class = match link {
        LinkState::Connected => "link-badge connected",
        LinkState::Offline => "link-badge offline",
        LinkState::Connecting => "link-badge connecting",
    };

    rsx! {
        div { class: "header",
            h1 { "FedSim Console" }
            span { class: "{badge_class}", "{link.label()}" }
        }
    }
}

/// Tab bar for switching between the console pages
#[component]
pub fn TabBar(current_tab: Tab, on_select: EventHandler<Tab>) -> Element {
    rsx! {
        div { class: "tab-bar",
            for tab in Tab::ALL {
                button {
                    class: if tab == current_tab { "tab-button active" } else { "tab-button" },
                    onclick: move |_| on_select.call(tab),
                    "{tab.label()}"
                }
            }
        }
    }
}

/// Control bar: status badge, round progress, start/stop buttons.
///
/// Button enablement is derived from the control state: an operator cannot
/// stop while a start is in flight, and vice versa.
#[component]
pub fn ControlBar(
    view: UiSnapshot,
    on_start: EventHandler<()>,
    on_stop: EventHandler<()>,
) -> Element {
    let start_disabled = !view.can_start();
    let stop_disabled = !view.can_stop();
    let status = view.status.status;

    rsx! {
        div { class: "control-bar",
            div { class: "control-info",
                h2 { "Control Panel" }
                p { class: "control-subtitle", "Manage the federated-learning simulation" }
            }

            div { class: "control-actions",
                if view.status.total_rounds > 0 {
                    div { class: "round-progress",
                        span { class: "round-current", "{view.status.current_round}" }
                        span { class: "round-separator", "/" }
                        span { class: "round-max", "{view.status.total_rounds}" }
                        span { class: "round-label", "rounds" }
                    }
                }

                span {
                    class: format!("status-badge status-{}", status.as_str().to_lowercase()),
                    title: "{view.control.label()}",
                    "{status.as_str()}"
                }

                button {
                    class: if start_disabled { "control-btn start disabled" } else { "control-btn start" },
                    disabled: start_disabled,
                    onclick: move |_| on_start.call(()),
                    "▶ Start Simulation"
                }

                button {
                    class: if stop_disabled { "control-btn stop disabled" } else { "control-btn stop" },
                    disabled: stop_disabled,
                    onclick: move |_| on_stop.call(()),
                    "■ Stop"
                }
            }
        }
    }
}

/// Banner for backend-reported errors and failed commands
#[component]
pub fn ErrorBanner(message: String) -> Element {
    rsx! {
        div { class: "error-banner", "Error: {message}" }
    }
}

/// System log panel. Lines arrive newest first (the caller reverses the
/// backend order).
#[component]
pub fn LogPanel(lines: Vec<String>) -> Element {
    rsx! {
        div { class: "panel log-panel",
            h3 { "System Logs" }
            div { class: "log-lines",
                if lines.is_empty() {
                    div { class: "empty-state", "Waiting for simulation..." }
                }
                for line in lines {
                    div { class: "log-line", "{line}" }
                }
            }
        }
    }
}

/// Compact preview of the most recent ledger blocks
#[component]
pub fn LedgerPanel(entries: Vec<LedgerEntry>, total: usize) -> Element {
    rsx! {
        div { class: "panel ledger-panel",
            h3 { "Secure Ledger" }
            p { class: "panel-subtitle", "Signed model updates, newest first ({total} total)" }
            div { class: "ledger-entries",
                if entries.is_empty() {
                    div { class: "empty-state", "Ledger Empty" }
                }
                for entry in entries {
                    div { class: "ledger-entry",
                        div { class: "ledger-entry-head",
                            span { "Block #{entry.id}" }
                            span { "{entry.time_label()}" }
                        }
                        div { class: "ledger-entry-client", "Client: {entry.client}" }
                        div { class: "ledger-entry-hash", "Enc: {entry.data_hash}" }
                        div { class: "ledger-entry-sig", "Sig: {entry.signature}" }
                    }
                }
            }
        }
    }
}

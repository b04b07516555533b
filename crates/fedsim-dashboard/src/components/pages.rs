//! Console pages
//!
//! Display-only views over the engine snapshot. The dashboard page carries
//! the controls; the roster pages render whatever the slow-cadence polls
//! last delivered.

use dioxus::prelude::*;
use fedsim_sync_engine::{ClientInfo, DatasetPreview, ModelInfo, UiSnapshot};

use super::charts::{chart_series, MetricChart};
use super::{ControlBar, ErrorBanner, LedgerPanel, LogPanel};

/// Main dashboard: controls, metric chart, system logs, ledger preview
#[component]
pub fn DashboardView(
    view: UiSnapshot,
    on_start: EventHandler<()>,
    on_stop: EventHandler<()>,
) -> Element {
    let (series, series_label) = chart_series(&view.chart);
    let logs: Vec<String> = view.logs_newest_first().map(str::to_string).collect();

    rsx! {
        div { class: "dashboard-page",
            ControlBar { view: view.clone(), on_start: on_start, on_stop: on_stop }

            // Backend-reported failure, cleared automatically on recovery
            if let Some(details) = view.status.error_details.clone() {
                ErrorBanner { message: details }
            }
            // Command failure, kept until the operator acts on it
            if let Some(message) = view.command_error.clone() {
                ErrorBanner { message }
            }

            div { class: "dashboard-grid",
                div { class: "panel chart-panel",
                    h3 { "{series_label}" }
                    MetricChart { data: series }
                }

                LedgerPanel {
                    entries: view.ledger_preview.clone(),
                    total: view.ledger.len(),
                }

                LogPanel { lines: logs }
            }
        }
    }
}

/// Participating edge devices
#[component]
pub fn ClientsView(clients: Vec<ClientInfo>) -> Element {
    rsx! {
        div { class: "page",
            h2 { "Connected Clients" }
            p { class: "page-subtitle", "Participating edge devices in the federation" }

            if clients.is_empty() {
                div { class: "empty-state", "No clients reported by the backend." }
            } else {
                table { class: "clients-table",
                    thead {
                        tr {
                            th { "Client ID" }
                            th { "Status" }
                            th { "Last Active" }
                            th { "Updates Contributed" }
                        }
                    }
                    tbody {
                        for client in clients {
                            tr {
                                td { class: "client-id", "{client.id}" }
                                td {
                                    span {
                                        class: format!(
                                            "client-status client-status-{}",
                                            client.status.to_lowercase()
                                        ),
                                        "{client.status}"
                                    }
                                }
                                td { "{client.last_active}" }
                                td { "{client.contribution} blocks" }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Training-data partitions available on the server
#[component]
pub fn DatasetsView(
    datasets: Vec<String>,
    preview: Option<DatasetPreview>,
    on_select: EventHandler<String>,
) -> Element {
    let selected = preview.as_ref().map(|p| p.dataset.clone());

    rsx! {
        div { class: "page datasets-page",
            h2 { "Datasets" }
            p { class: "page-subtitle", "Inspect training data partitions available on the server" }

            div { class: "datasets-layout",
                div { class: "panel datasets-list",
                    h3 { "Available Files" }
                    if datasets.is_empty() {
                        div { class: "empty-state", "No datasets found." }
                    }
                    for name in datasets {
                        {
                            let class = if selected.as_deref() == Some(name.as_str()) {
                                "dataset-item selected"
                            } else {
                                "dataset-item"
                            };
                            let label = name.clone();
                            rsx! {
                                button {
                                    class: "{class}",
                                    onclick: move |_| on_select.call(name.clone()),
                                    "{label}"
                                }
                            }
                        }
                    }
                }

                div { class: "panel dataset-viewer",
                    if let Some(preview) = preview {
                        div { class: "dataset-viewer-head",
                            h3 { "{preview.dataset}" }
                            span { class: "dataset-size", "Size: {preview.size_kib()} KB" }
                        }
                        pre { class: "dataset-preview", "{preview.preview}" }
                        p { class: "dataset-note", "* Showing the first 2000 characters only." }
                    } else {
                        div { class: "empty-state", "Select a dataset to view its content" }
                    }
                }
            }
        }
    }
}

/// Global model version info
#[component]
pub fn ModelsView(model: Option<ModelInfo>) -> Element {
    rsx! {
        div { class: "page",
            h2 { "Global Model" }
            p { class: "page-subtitle", "Version info of the aggregated global model" }

            div { class: "panel model-card",
                if let Some(model) = model {
                    h3 { "Current Global Model" }
                    div { class: "model-row",
                        span { class: "model-key", "Version" }
                        span { class: "model-value", "{model.version}" }
                    }
                    div { class: "model-row",
                        span { class: "model-key", "Last Updated" }
                        span { class: "model-value", "{model.timestamp}" }
                    }
                    if let Some(url) = model.weights_url {
                        div { class: "model-row",
                            span { class: "model-key", "Weights" }
                            span { class: "model-value", "{url}" }
                        }
                    }
                } else {
                    div { class: "empty-state", "Model info not available yet." }
                }
            }
        }
    }
}

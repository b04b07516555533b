use std::time::Duration;

use dioxus::prelude::*;
use fedsim_sync_engine::{EngineConfig, HttpGateway, Poller, SyncEngine, UiSnapshot};

use crate::components::pages::{ClientsView, DashboardView, DatasetsView, ModelsView};
use crate::components::{Header, TabBar};

/// Top-level pages of the console.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Dashboard,
    Clients,
    Datasets,
    Models,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Dashboard, Tab::Clients, Tab::Datasets, Tab::Models];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Clients => "Clients",
            Tab::Datasets => "Datasets",
            Tab::Models => "Models",
        }
    }
}

/// Root App component for the FedSim Console
///
/// Owns the sync engine and its poll loops, and renders whatever snapshot
/// the engine produces. Everything below this component is display-only.
#[component]
pub fn App() -> Element {
    // The engine is built once for the lifetime of the window.
    let engine = use_hook(|| {
        let config = EngineConfig::from_env();
        HttpGateway::new(&config).map(|gateway| SyncEngine::new(gateway, config))
    });

    let engine = match engine {
        Ok(engine) => engine,
        Err(err) => {
            return rsx! {
                div { class: "fatal-error",
                    "Failed to initialize the HTTP client: {err}"
                }
            };
        }
    };

    let mut snapshot = use_signal(UiSnapshot::default);
    let mut current_tab = use_signal(Tab::default);

    // Poll loops live inside this future for the lifetime of the app; the
    // render loop copies the engine snapshot into the signal whenever it
    // actually changed.
    let poll_engine = engine.clone();
    let _poll_loop = use_future(move || {
        let engine = poll_engine.clone();
        async move {
            let mut poller = Poller::default();
            poller.start(&engine, engine.config());
            loop {
                tokio::time::sleep(Duration::from_millis(200)).await;
                let next = engine.snapshot();
                if *snapshot.peek() != next {
                    snapshot.set(next);
                }
            }
        }
    });

    let start_engine = engine.clone();
    let on_start = move |_| {
        let engine = start_engine.clone();
        spawn(async move {
            engine.request_start().await;
        });
    };

    let stop_engine = engine.clone();
    let on_stop = move |_| {
        let engine = stop_engine.clone();
        spawn(async move {
            engine.request_stop().await;
        });
    };

    let preview_engine = engine.clone();
    let on_select_dataset = move |name: String| {
        let engine = preview_engine.clone();
        spawn(async move {
            if let Err(err) = engine.load_dataset_preview(&name).await {
                tracing::warn!(error = %err, "failed to load dataset preview");
            }
        });
    };

    let view = snapshot();

    rsx! {
        div { class: "console",
            Header { link: view.link }

            div { class: "tab-bar-container",
                TabBar {
                    current_tab: current_tab(),
                    on_select: move |tab: Tab| {
                        current_tab.set(tab);
                    }
                }
            }

            div { class: "content",
                match current_tab() {
                    Tab::Dashboard => rsx! {
                        DashboardView {
                            view: view.clone(),
                            on_start: on_start,
                            on_stop: on_stop,
                        }
                    },
                    Tab::Clients => rsx! {
                        ClientsView { clients: view.roster.clients.clone() }
                    },
                    Tab::Datasets => rsx! {
                        DatasetsView {
                            datasets: view.roster.datasets.clone(),
                            preview: view.roster.dataset_preview.clone(),
                            on_select: on_select_dataset,
                        }
                    },
                    Tab::Models => rsx! {
                        ModelsView { model: view.roster.model.clone() }
                    },
                }
            }
        }
    }
}

use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{error, info};
use tokio::runtime::Runtime;

use crate::api::client::ApiClient;
use crate::config::{normalize_base_url, AppConfig};
use crate::survey::controller::{FormController, RepaintHook};
use crate::survey::error::FetchError;
use crate::survey::types::{SurveyId, SurveySummary};

use super::form::FormView;

pub enum Catalog {
    Idle,
    Loading,
    Loaded(Vec<SurveySummary>),
    Failed(String),
}

pub struct AppState {
    pub server_address: String,
    pub status_message: String,
    pub catalog: Catalog,
    pub form: Option<FormView>,
    config: AppConfig,
    client: ApiClient,
    runtime: Runtime,
    repaint: RepaintHook,
    catalog_receiver: Option<Receiver<Result<Vec<SurveySummary>, FetchError>>>,
}

impl AppState {
    pub fn new(config: AppConfig, repaint: RepaintHook) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("survey-io")
            .build()
            .context("failed to start async runtime")?;
        let client = ApiClient::new(&config)?;
        Ok(Self {
            server_address: config.api_base_url.clone(),
            status_message: "Idle".to_owned(),
            catalog: Catalog::Idle,
            form: None,
            config,
            client,
            runtime,
            repaint,
            catalog_receiver: None,
        })
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    pub fn fetch_surveys(&mut self) {
        let client = self.client.clone();
        let repaint = Arc::clone(&self.repaint);
        let (sender, receiver) = channel();
        self.catalog_receiver = Some(receiver);
        self.catalog = Catalog::Loading;

        self.runtime.spawn(async move {
            let result = client.list_surveys().await;
            if sender.send(result).is_err() {
                info!("Survey list arrived after it was no longer wanted");
            }
            repaint();
        });
    }

    pub fn apply_server_address(&mut self) {
        let mut config = self.config.clone();
        config.api_base_url = normalize_base_url(&self.server_address);
        match ApiClient::new(&config) {
            Ok(client) => {
                info!("Switching API server to {}", config.api_base_url);
                self.status_message = format!("Using {}", config.api_base_url);
                self.server_address = config.api_base_url.clone();
                self.client = client;
                self.config = config;
                self.fetch_surveys();
            }
            Err(e) => {
                error!("Rejected server address {}: {:#}", self.server_address, e);
                self.status_message = format!("Invalid server address: {:#}", e);
            }
        }
    }

    pub fn open_form(&mut self, survey_id: SurveyId) {
        if let Some(mut previous) = self.form.take() {
            previous.close();
        }
        info!("Opening survey {}", survey_id);
        let client = Arc::new(self.client.clone());
        let controller = FormController::load(
            survey_id,
            Arc::clone(&client),
            client,
            self.runtime.handle().clone(),
            Arc::clone(&self.repaint),
        );
        self.form = Some(FormView::new(controller));
        self.status_message = "Loading survey...".to_owned();
    }

    pub fn close_form(&mut self) {
        if let Some(mut form) = self.form.take() {
            form.close();
            self.status_message = "Form closed".to_owned();
        }
    }

    /// Drains finished background work into screen state.
    pub fn poll(&mut self) {
        if let Some(receiver) = &self.catalog_receiver {
            match receiver.try_recv() {
                Ok(Ok(surveys)) => {
                    self.status_message = format!("{} surveys available", surveys.len());
                    self.catalog = Catalog::Loaded(surveys);
                    self.catalog_receiver = None;
                }
                Ok(Err(e)) => {
                    error!("Failed to fetch survey list: {}", e);
                    self.status_message = "Failed to fetch survey list".to_owned();
                    self.catalog = Catalog::Failed(e.to_string());
                    self.catalog_receiver = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => self.catalog_receiver = None,
            }
        }
        if let Some(form) = &mut self.form {
            if form.poll() > 0 {
                self.status_message = form.status().to_owned();
            }
        }
    }
}

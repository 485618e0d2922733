//! Portal controller
//!
//! Owns every piece of UI state (menu, trámite modal, chat window, privacy
//! notice) and exposes one handler per user action.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use super::chat::{ChatMessage, ChatPanel};
use super::menu::{MenuController, MenuError, MenuItem};
use super::privacy::{ClientStorage, PrivacyNotice};
use super::tramite_modal::{OpenModal, TramiteModal};
use crate::chat::{bot_reply, CONNECTION_ERROR_REPLY};
use crate::client::PortalClient;
use crate::pdf::{local_filename, record_filename, render_document};
use crate::types::{AppError, AppResult, TramiteTipo};

/// Delay before the simulated assistant answers.
pub const LOCAL_REPLY_DELAY: Duration = Duration::from_millis(600);

/// Where chat replies come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    /// Keyword replies computed in the client.
    Simulated,
    /// Replies from the backend's `/api/message`.
    Server,
}

/// Where the certificate PDF comes from after a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentDelivery {
    /// Rendered in the client from the submitted form.
    Local,
    /// Downloaded from `/api/descargar-pdf/{id}`.
    Server,
}

/// A document ready to be handed to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Download {
    pub async fn save_to(&self, dir: &Path) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let path = dir.join(&self.filename);
        tokio::fs::write(&path, &self.bytes)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub id: i64,
    pub download: Download,
}

pub struct PortalController<S: ClientStorage> {
    menu: MenuController,
    modal: TramiteModal,
    chat: ChatPanel,
    privacy: PrivacyNotice<S>,
    client: PortalClient,
    chat_mode: ChatMode,
    delivery: DocumentDelivery,
    reply_delay: Duration,
}

impl<S: ClientStorage> PortalController<S> {
    pub fn new(client: PortalClient, storage: S) -> Self {
        Self {
            menu: MenuController::portal(),
            modal: TramiteModal::new(),
            chat: ChatPanel::new(),
            privacy: PrivacyNotice::new(storage),
            client,
            chat_mode: ChatMode::Simulated,
            delivery: DocumentDelivery::Local,
            reply_delay: LOCAL_REPLY_DELAY,
        }
    }

    pub fn with_chat_mode(mut self, mode: ChatMode) -> Self {
        self.chat_mode = mode;
        self
    }

    pub fn with_delivery(mut self, delivery: DocumentDelivery) -> Self {
        self.delivery = delivery;
        self
    }

    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    pub fn menu(&self) -> &MenuController {
        &self.menu
    }

    pub fn modal(&self) -> &TramiteModal {
        &self.modal
    }

    pub fn chat(&self) -> &ChatPanel {
        &self.chat
    }

    pub fn privacy(&self) -> &PrivacyNotice<S> {
        &self.privacy
    }

    /// Page load. Returns whether the privacy notice must be shown.
    pub fn on_load(&mut self) -> bool {
        self.privacy.on_load()
    }

    pub fn on_privacy_checkbox(&mut self, checked: bool) {
        self.privacy.set_checked(checked);
    }

    pub fn on_privacy_confirm(&mut self) -> AppResult<bool> {
        self.privacy.confirm()
    }

    pub fn on_menu_click(&mut self, item_id: &str) -> Result<&MenuItem, MenuError> {
        self.menu.select(item_id)
    }

    pub fn on_solicitar(&mut self, tipo: TramiteTipo) -> &OpenModal {
        info!(tipo = %tipo, "Opening trámite form");
        self.modal.open(tipo)
    }

    pub fn on_field_input(&mut self, name: &str, value: &str) -> AppResult<()> {
        Ok(self.modal.set_field(name, value)?)
    }

    pub fn on_cancel(&mut self) {
        self.modal.cancel();
    }

    /// Submit the open form. The modal closes only when the record was stored
    /// and the document obtained; on error it stays open for another attempt.
    pub async fn on_submit(&mut self) -> AppResult<SubmitOutcome> {
        let flat = self.modal.collect()?;
        let submission = self.modal.submission()?;
        let tipo = submission.tipo.clone().unwrap_or_default();

        let id = self.client.guardar_tramite(&submission).await?;

        let download = match self.delivery {
            DocumentDelivery::Local => Download {
                filename: local_filename(&tipo),
                bytes: render_document(&tipo, &flat)?,
            },
            DocumentDelivery::Server => Download {
                filename: record_filename(id),
                bytes: self.client.descargar_pdf(id).await?,
            },
        };

        self.modal.close_after_submit();
        info!(id, tipo = %tipo, "Trámite submitted");
        Ok(SubmitOutcome { id, download })
    }

    /// Send the text box content. Returns the bot bubble, or `None` for blank input.
    pub async fn on_send_chat(&mut self, raw: &str) -> Option<ChatMessage> {
        let text = self.chat.submit_input(raw)?;

        let reply = match self.chat_mode {
            ChatMode::Simulated => {
                if !self.reply_delay.is_zero() {
                    tokio::time::sleep(self.reply_delay).await;
                }
                bot_reply(&text).to_string()
            }
            ChatMode::Server => match self.client.enviar_mensaje(&text).await {
                Ok(reply) => reply.reply,
                Err(e) => {
                    warn!(error = %e, "Chat request failed");
                    CONNECTION_ERROR_REPLY.to_string()
                }
            },
        };

        Some(self.chat.push_bot(reply).clone())
    }
}

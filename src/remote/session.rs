// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Stateful session client for the AC web remote panel
//!
//! [`PanelSession`] owns the HTTP client (cookie jar included — the panel is
//! session-cookie based) and the mutable protocol state: hidden tokens,
//! observed unit state, target temperature, power flag and the pending
//! action marker. Every request/response cycle runs under one internal
//! mutex, so a command post, a state refresh and a keep-alive re-login can
//! never interleave on the wire.
//!
//! Observed command payload semantics (fixed per device):
//!
//! ```text
//! hdnNo_1  = 0 off / 1 on          hdnNo_10 = wind speed index
//! hdnNo_2  = 25                    hdnNo_11 = wind angle index
//! hdnNo_3  = 1 (cooling class)     hdnNo_12 = upper temp bound, excluded
//! hdnNo_4  = target temp           hdnNo_13 = lower temp bound
//! hdnNo_5..hdnNo_8, hdnNo_14..hdnNo_18 = permission/constant flags
//! whichbtn = 0, btnSubmit.x/.y = click coordinates of the virtual button
//! ```

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, info, warn};
use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::config::RemoteConfig;

use super::{page, PanelAction, PanelPage, PanelState, RemoteError};

/// Mutable protocol state, guarded by the session mutex (single-flight).
#[derive(Debug, Default)]
struct SessionInner {
    /// Server-issued anti-forgery tokens, echoed on the next request
    hidden_fields: HashMap<String, String>,
    /// Last state decoded from a panel page
    observed: Option<PanelState>,
    /// Temperature the next command will ask for
    target_temp: i32,
    /// Last commanded power state
    powered: bool,
    /// Intent marker for the next command post
    action: PanelAction,
}

/// Browser-session emulator for the panel.
pub struct PanelSession {
    client: reqwest::Client,
    url: String,
    url_remote: String,
    cfg: RemoteConfig,
    inner: Mutex<SessionInner>,
}

impl PanelSession {
    /// Build a session against the configured panel. No request is made yet.
    pub fn new(cfg: &RemoteConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;

        let url = format!("http://{}/", cfg.host);
        let url_remote = format!("{}webremo", url);

        Ok(Self {
            client,
            url,
            url_remote,
            cfg: cfg.clone(),
            inner: Mutex::new(SessionInner {
                target_temp: cfg.target_temp,
                ..SessionInner::default()
            }),
        })
    }

    /// Lowest temperature the unit accepts.
    pub fn lower_bound(&self) -> i32 {
        self.cfg.lower_temp
    }

    /// Temperature bound the unit excludes.
    pub fn upper_bound(&self) -> i32 {
        self.cfg.upper_temp
    }

    /// Last commanded power state.
    pub async fn is_powered(&self) -> bool {
        self.inner.lock().await.powered
    }

    /// Temperature the next command will ask for.
    pub async fn target_temp(&self) -> i32 {
        self.inner.lock().await.target_temp
    }

    /// Intent marker for the next command post.
    pub async fn pending_action(&self) -> PanelAction {
        self.inner.lock().await.action
    }

    /// Last state decoded from a panel page, if any.
    pub async fn observed_state(&self) -> Option<PanelState> {
        self.inner.lock().await.observed.clone()
    }

    /// Current hidden-token set, as it would be echoed on the next request.
    pub async fn tokens(&self) -> HashMap<String, String> {
        self.inner.lock().await.hidden_fields.clone()
    }

    /// Perform login and follow into the web remote controller page.
    ///
    /// On the first call the landing page is fetched to seed the hidden
    /// tokens; afterwards the stored tokens are posted together with the
    /// credentials. A non-success status fails with
    /// [`RemoteError::Authentication`] — a failed login is fatal to the
    /// caller, who decides whether to retry.
    pub async fn login(&self) -> Result<PanelState, RemoteError> {
        let mut inner = self.inner.lock().await;

        if inner.hidden_fields.is_empty() {
            let body = self.client.get(&self.url).send().await?.text().await?;
            inner.hidden_fields = page::hidden_fields(&body)?;
        }

        let mut form: Vec<(String, String)> = inner
            .hidden_fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        form.push(("txtId".to_string(), self.cfg.login_id.clone()));
        form.push(("txtPwd".to_string(), self.cfg.password.clone()));

        let response = self.client.post(&self.url).form(&form).send().await?;
        let response = response
            .error_for_status()
            .map_err(RemoteError::Authentication)?;

        info!("Login successful");

        let body = response.text().await?;
        self.adopt_page(&mut inner, &body)
    }

    /// Issue a state-only fetch and re-parse the full page.
    pub async fn refresh(&self) -> Result<PanelState, RemoteError> {
        let mut inner = self.inner.lock().await;

        let body = self.client.get(&self.url).send().await?.text().await?;
        self.adopt_page(&mut inner, &body)
    }

    /// Refresh and return the unit's reported indoor temperature.
    pub async fn current_temp(&self) -> Result<i32, RemoteError> {
        Ok(self.refresh().await?.current_temp)
    }

    /// Power the unit on.
    pub async fn power_on(&self) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock().await;
        inner.action = PanelAction::PowerOn;
        inner.powered = true;
        self.send_action(&mut inner).await
    }

    /// Power the unit off.
    pub async fn power_off(&self) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock().await;
        inner.action = PanelAction::PowerOff;
        inner.powered = false;
        self.send_action(&mut inner).await
    }

    /// Command a specific target temperature.
    ///
    /// Valid targets satisfy `lower_bound <= temp < upper_bound`; anything
    /// else fails locally with [`RemoteError::TemperatureOutOfBounds`] and
    /// no request is sent.
    pub async fn set_temp(&self, temp: i32) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock().await;

        if !(self.cfg.lower_temp <= temp && temp < self.cfg.upper_temp) {
            return Err(self.out_of_bounds(temp));
        }

        inner.target_temp = temp;
        self.send_action(&mut inner).await
    }

    /// Raise the target temperature by 1.
    pub async fn temp_up(&self) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock().await;

        if inner.target_temp >= self.cfg.upper_temp {
            return Err(self.out_of_bounds(inner.target_temp + 1));
        }

        inner.target_temp += 1;
        inner.action = PanelAction::TempUp;
        self.send_action(&mut inner).await
    }

    /// Lower the target temperature by 1.
    ///
    /// The unit refuses to go below `lower_bound + 1` on decrement; the
    /// lower bound itself is only reachable through `set_temp`. This
    /// asymmetry matches the unit's observed behavior and is kept as-is.
    pub async fn temp_down(&self) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock().await;

        if inner.target_temp - 1 <= self.cfg.lower_temp {
            return Err(self.out_of_bounds(inner.target_temp - 1));
        }

        inner.target_temp -= 1;
        inner.action = PanelAction::TempDown;
        self.send_action(&mut inner).await
    }

    /// Keep the observed state fresh.
    ///
    /// Sleeps `state_interval_secs` plus a random jitter, then refreshes.
    /// A failed refresh is logged and retried on the next cycle; the loop
    /// only ends by external cancellation.
    pub async fn keep_alive_state(&self) -> Result<(), RemoteError> {
        debug!("Keepalive state started");

        loop {
            sleep(Duration::from_secs(
                self.cfg.state_interval_secs + jitter_secs(self.cfg.state_jitter_secs),
            ))
            .await;

            if let Err(err) = self.refresh().await {
                warn!("Keep-alive refresh failed: {}", err);
            }
        }
    }

    /// Preempt the server's silent session expiry.
    ///
    /// Sleeps `relogin_interval_secs` plus a random jitter, performs a full
    /// re-login (the expired session cannot merely be pinged), waits a short
    /// settle delay, then resends the last command state. Expects
    /// [`keep_alive_state`](Self::keep_alive_state) to run alongside so the
    /// observed values stay fresh between these coarse cycles.
    ///
    /// A rejected login propagates out of the loop; transient transport or
    /// command failures are logged and retried on the next cycle.
    pub async fn keep_alive_power(&self) -> Result<(), RemoteError> {
        debug!("Keepalive power started");

        loop {
            let sleep_duration =
                self.cfg.relogin_interval_secs + jitter_secs(self.cfg.relogin_jitter_secs);
            debug!("Sleeping for {}s", sleep_duration);

            sleep(Duration::from_secs(sleep_duration)).await;

            match self.login().await {
                Ok(_) => {
                    sleep(Duration::from_secs(self.cfg.relogin_settle_secs)).await;

                    let mut inner = self.inner.lock().await;
                    if let Err(err) = self.send_action(&mut inner).await {
                        warn!("Keep-alive resend failed: {}", err);
                    }
                }
                Err(err @ RemoteError::Authentication(_)) => return Err(err),
                Err(err) => warn!("Keep-alive re-login failed: {}", err),
            }
        }
    }

    /// Adopt a freshly fetched page: tokens, observed state, and the
    /// panel's reported target temperature all overwrite the local values.
    fn adopt_page(
        &self,
        inner: &mut SessionInner,
        body: &str,
    ) -> Result<PanelState, RemoteError> {
        inner.hidden_fields = page::hidden_fields(body)?;

        let mut state = page::parse_state(body)?;
        state.power = inner.powered;

        inner.target_temp = state.target_temp;
        inner.observed = Some(state.clone());

        info!("Cur. temp      : {}", state.current_temp);
        info!("Cur. operation : {}", state.operation_mode);
        info!("Cur. wind speed: {}", state.wind_speed);
        info!("Cur. wind angle: {}", state.wind_angle);

        Ok(state)
    }

    /// Post the current command state to the panel.
    ///
    /// The pending action marker is reset on every path, success or
    /// failure, so the session never believes an action is still in
    /// flight. On success the hidden tokens are re-extracted from the
    /// command response; an unparseable response keeps the previous
    /// tokens with a warning.
    async fn send_action(&self, inner: &mut SessionInner) -> Result<(), RemoteError> {
        info!("Sending request!");
        debug!(
            "Power {} / TGT temp {}",
            inner.powered, inner.target_temp
        );

        let payload = self.build_payload(inner);
        let result = self.post_command(payload).await;

        // reset action
        inner.action = PanelAction::Idle;

        let body = result?;
        match PanelPage::parse(&body) {
            Ok(page) => inner.hidden_fields = page.hidden_fields,
            Err(err) => warn!("Command response unparseable, keeping previous tokens: {}", err),
        }

        Ok(())
    }

    async fn post_command(&self, payload: Vec<(String, String)>) -> Result<String, RemoteError> {
        let response = self
            .client
            .post(&self.url_remote)
            .form(&payload)
            .send()
            .await
            .map_err(RemoteError::CommandRejected)?;

        let status_error = response.error_for_status_ref().err();
        match status_error {
            None => response.text().await.map_err(RemoteError::CommandRejected),
            Some(err) => {
                warn!("{}", err);
                if let Ok(body) = response.text().await {
                    debug!("Received response:\n{}", body);
                }
                Err(RemoteError::CommandRejected(err))
            }
        }
    }

    /// Merge the fixed device constants, the current command state, the
    /// virtual button coordinates and the freshest hidden tokens into one
    /// form payload.
    fn build_payload(&self, inner: &SessionInner) -> Vec<(String, String)> {
        let (btn_x, btn_y) = inner.action.submit_coords();

        let mut payload: Vec<(String, String)> = vec![
            ("hdnNo_1", if inner.powered { 1 } else { 0 }),
            ("hdnNo_2", 25),
            ("hdnNo_3", 1),
            ("hdnNo_4", inner.target_temp),
            ("hdnNo_5", 0),
            ("hdnNo_6", 0),
            ("hdnNo_7", 0),
            ("hdnNo_8", 1),
            ("hdnNo_10", self.cfg.wind_speed as i32),
            ("hdnNo_11", self.cfg.wind_angle as i32),
            ("hdnNo_12", self.cfg.upper_temp),
            ("hdnNo_13", self.cfg.lower_temp),
            ("hdnNo_14", 1),
            ("hdnNo_15", 1),
            ("hdnNo_16", 1),
            ("hdnNo_17", 1),
            ("hdnNo_18", 1),
            ("whichbtn", 0),
            ("btnSubmit.x", btn_x as i32),
            ("btnSubmit.y", btn_y as i32),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        payload.extend(
            inner
                .hidden_fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        payload
    }

    fn out_of_bounds(&self, target: i32) -> RemoteError {
        RemoteError::TemperatureOutOfBounds {
            target,
            lower: self.cfg.lower_temp,
            upper: self.cfg.upper_temp,
        }
    }
}

/// Random addition to a sleep interval, avoiding synchronized bursts.
pub(crate) fn jitter_secs(max: u64) -> u64 {
    if max == 0 {
        return 0;
    }
    rand::rng().random_range(0..=max)
}

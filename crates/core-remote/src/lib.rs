//! Remote-control extension point.
//!
//! An external controller never touches engine state. Each call becomes an
//! [`Event::Remote`] on the main loop channel; the loop triggers the matching
//! `_remote_*_` event and answers through the request's oneshot slot
//! (see [`reply_for`]). No wire protocol lives here: transports wrap a
//! [`RemoteControl`] implementation.

use anyhow::{Result, anyhow, bail};
use core_events::{
    Event, Outcome, RemoteCommand, RemoteReply, RemoteRequest, RemoteStatus, Value,
};
use std::future::Future;
use tokio::sync::mpsc::Sender;
use tracing::debug;

/// Operations a remote controller may perform.
pub trait RemoteControl: Send + Sync {
    /// Stable identifier for logs.
    fn name(&self) -> &'static str;
    /// Inject `data`; `kind` of `command` submits a line, anything else a key.
    fn input(&self, data: &str, kind: Option<&str>) -> impl Future<Output = Result<()>> + Send;
    /// Bytes of the most recently rendered frame.
    fn output(&self) -> impl Future<Output = Result<Vec<u8>>> + Send;
    fn start(&self) -> impl Future<Output = Result<()>> + Send;
    fn stop(&self) -> impl Future<Output = Result<()>> + Send;
    fn status(&self) -> impl Future<Output = Result<RemoteStatus>> + Send;
}

/// In-process controller that marshals every call through the main loop.
#[derive(Debug, Clone)]
pub struct ChannelRemote {
    tx: Sender<Event>,
}

impl ChannelRemote {
    pub fn new(tx: Sender<Event>) -> Self {
        Self { tx }
    }

    async fn request(&self, command: RemoteCommand) -> Result<RemoteReply> {
        let event = command.event_name();
        let (request, rx) = RemoteRequest::new(command);
        self.tx
            .send(Event::Remote(request))
            .await
            .map_err(|_| anyhow!("event loop closed"))?;
        debug!(target: "remote", event, "remote_request_sent");
        match rx.await {
            Ok(RemoteReply::Failed(reason)) => bail!("{event} failed: {reason}"),
            Ok(reply) => Ok(reply),
            Err(_) => bail!("{event} dropped without a reply"),
        }
    }
}

impl RemoteControl for ChannelRemote {
    fn name(&self) -> &'static str {
        "channel"
    }

    async fn input(&self, data: &str, kind: Option<&str>) -> Result<()> {
        self.request(RemoteCommand::Input {
            data: data.to_string(),
            kind: kind.map(str::to_string),
        })
        .await?;
        Ok(())
    }

    async fn output(&self) -> Result<Vec<u8>> {
        match self.request(RemoteCommand::Output).await? {
            RemoteReply::Output(bytes) => Ok(bytes),
            other => bail!("unexpected reply to output: {other:?}"),
        }
    }

    async fn start(&self) -> Result<()> {
        self.request(RemoteCommand::Start).await?;
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.request(RemoteCommand::Stop).await?;
        Ok(())
    }

    async fn status(&self) -> Result<RemoteStatus> {
        match self.request(RemoteCommand::Status).await? {
            RemoteReply::Status(status) => Ok(status),
            other => bail!("unexpected reply to status: {other:?}"),
        }
    }
}

/// Controller used when remote control is disabled: accepts everything and
/// reports itself stopped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRemote;

impl RemoteControl for NoopRemote {
    fn name(&self) -> &'static str {
        "noop"
    }

    async fn input(&self, _data: &str, _kind: Option<&str>) -> Result<()> {
        Ok(())
    }

    async fn output(&self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    async fn start(&self) -> Result<()> {
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        Ok(())
    }

    async fn status(&self) -> Result<RemoteStatus> {
        Ok(RemoteStatus::Stopped)
    }
}

/// Arguments the main loop passes when triggering `command.event_name()`.
pub fn trigger_args(command: &RemoteCommand) -> Vec<Value> {
    match command {
        RemoteCommand::Input { data, kind } => {
            let mut args = vec![Value::from(data.as_str())];
            if let Some(kind) = kind {
                args.push(Value::from(kind.as_str()));
            }
            args
        }
        _ => Vec::new(),
    }
}

/// Translate the trigger result for `command` into the reply sent back.
pub fn reply_for(command: &RemoteCommand, result: Result<Outcome>) -> RemoteReply {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => return RemoteReply::Failed(format!("{err:#}")),
    };
    match command {
        RemoteCommand::Output => {
            RemoteReply::Output(outcome.last_value().map(|v| v.as_bytes().to_vec()).unwrap_or_default())
        }
        RemoteCommand::Status => match outcome.last_value().and_then(Value::as_str) {
            Some("running") => RemoteReply::Status(RemoteStatus::Running),
            _ => RemoteReply::Status(RemoteStatus::Stopped),
        },
        _ => RemoteReply::Done,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;
    use tokio::task::JoinHandle;

    /// Minimal loop answering remote requests from a fixed state.
    fn serve(mut rx: mpsc::Receiver<Event>, seen: mpsc::UnboundedSender<String>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut running = false;
            while let Some(event) = rx.recv().await {
                let Event::Remote(RemoteRequest { command, reply }) = event else {
                    continue;
                };
                let _ = seen.send(command.event_name().to_string());
                let outcome = match &command {
                    RemoteCommand::Start => {
                        running = true;
                        Ok(Outcome::default())
                    }
                    RemoteCommand::Stop => {
                        running = false;
                        Ok(Outcome::default())
                    }
                    RemoteCommand::Status => Ok(Outcome {
                        values: vec![Value::from(if running { "running" } else { "stopped" })],
                        ..Outcome::default()
                    }),
                    RemoteCommand::Output => Ok(Outcome {
                        values: vec![Value::from(b"\x1b[1;1Hhi".to_vec())],
                        ..Outcome::default()
                    }),
                    RemoteCommand::Input { data, .. } if data == "boom" => {
                        Err(anyhow!("handler exploded"))
                    }
                    RemoteCommand::Input { .. } => Ok(Outcome::default()),
                };
                let _ = reply.send(reply_for(&command, outcome));
            }
        })
    }

    #[tokio::test]
    async fn channel_remote_round_trips_through_the_loop() {
        let (tx, rx) = mpsc::channel(8);
        let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();
        let handle = serve(rx, seen_tx);
        let remote = ChannelRemote::new(tx);

        assert_eq!(remote.status().await.unwrap(), RemoteStatus::Stopped);
        remote.start().await.unwrap();
        assert_eq!(remote.status().await.unwrap(), RemoteStatus::Running);
        assert_eq!(remote.output().await.unwrap(), b"\x1b[1;1Hhi".to_vec());
        remote.input("a", None).await.unwrap();
        remote.stop().await.unwrap();
        assert_eq!(remote.status().await.unwrap(), RemoteStatus::Stopped);

        drop(remote);
        handle.await.unwrap();
        let mut events = Vec::new();
        while let Ok(name) = seen_rx.try_recv() {
            events.push(name);
        }
        assert_eq!(
            events,
            vec![
                "_remote_status_",
                "_remote_start_",
                "_remote_status_",
                "_remote_retrieve_output_",
                "_remote_input_",
                "_remote_stop_",
                "_remote_status_",
            ]
        );
    }

    #[tokio::test]
    async fn handler_failure_surfaces_as_error() {
        let (tx, rx) = mpsc::channel(8);
        let (seen_tx, _seen_rx) = mpsc::unbounded_channel();
        let _handle = serve(rx, seen_tx);
        let remote = ChannelRemote::new(tx);
        let err = remote.input("boom", Some("command")).await.unwrap_err();
        assert!(err.to_string().contains("handler exploded"), "{err}");
    }

    #[tokio::test]
    async fn closed_loop_is_an_error() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let remote = ChannelRemote::new(tx);
        assert!(remote.start().await.is_err());
    }

    #[tokio::test]
    async fn dropped_reply_is_an_error() {
        let (tx, mut rx) = mpsc::channel(1);
        let remote = ChannelRemote::new(tx);
        let drop_task = tokio::spawn(async move {
            // Receive and discard the request without answering.
            let _ = rx.recv().await;
        });
        let err = remote.status().await.unwrap_err();
        assert!(err.to_string().contains("without a reply"));
        drop_task.await.unwrap();
    }

    #[tokio::test]
    async fn noop_remote_reports_stopped() {
        let remote = NoopRemote;
        remote.start().await.unwrap();
        remote.input("x", None).await.unwrap();
        assert!(remote.output().await.unwrap().is_empty());
        assert_eq!(remote.status().await.unwrap(), RemoteStatus::Stopped);
        assert_eq!(remote.name(), "noop");
    }

    #[test]
    fn input_args_carry_optional_kind() {
        let key = RemoteCommand::Input {
            data: "a".into(),
            kind: None,
        };
        assert_eq!(trigger_args(&key), vec![Value::from("a")]);
        let line = RemoteCommand::Input {
            data: "ls".into(),
            kind: Some("command".into()),
        };
        assert_eq!(
            trigger_args(&line),
            vec![Value::from("ls"), Value::from("command")]
        );
        assert!(trigger_args(&RemoteCommand::Status).is_empty());
    }

    #[test]
    fn missing_output_value_yields_empty_bytes() {
        let reply = reply_for(&RemoteCommand::Output, Ok(Outcome::default()));
        assert_eq!(reply, RemoteReply::Output(Vec::new()));
    }
}

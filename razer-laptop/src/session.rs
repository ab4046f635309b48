//! Device session: exclusive owner of one EC handle
//!
//! The bus allows exactly one outstanding command per device, so the session
//! funnels every operation through a single worker thread draining an mpsc
//! queue. Callers get strict submission-order execution with no interleaving
//! between command sequences; suspension happens only while the worker waits
//! on the device.
//!
//! Cancellation: a queued operation whose caller has gone away (reply
//! channel closed) is skipped before its first command is sent. Once a
//! command is in flight the transaction runs to completion; a half-sent
//! feature report cannot be aborted.

use std::sync::Arc;

use futures::executor::block_on;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use razer_transport::{
    discovery, Command, DecodedReport, DeviceIdentity, TransactionManager, Transport,
};

use crate::actions::Action;
use crate::catalog::{self, spec, Family};
use crate::error::{ApplyError, DeviceError};
use crate::probes::{self, Probe, Reading};
use crate::profile::{profile_for, DeviceProfile};
use crate::resolver;
use crate::types::{Cluster, CpuBoost, FanZone, GpuBoost, LogoMode};

/// Depth of the submission queue
const QUEUE_DEPTH: usize = 16;

enum JobKind {
    Apply(Action),
    Read(Probe),
    Raw(Command),
}

enum JobReply {
    Applied(Result<(), ApplyError>),
    Value(Result<Reading, DeviceError>),
    Raw(Result<DecodedReport, DeviceError>),
}

struct Job {
    kind: JobKind,
    reply: oneshot::Sender<JobReply>,
}

/// Handle to one open device.
///
/// All operations go through `apply`/`read`/`raw`; dropping the session
/// closes the queue, stops the worker and releases the HID handle.
pub struct DeviceSession {
    tx: mpsc::Sender<Job>,
    identity: DeviceIdentity,
    profile: DeviceProfile,
}

impl DeviceSession {
    /// Open the EC interface of the given product id and start the worker.
    pub fn open(pid: u16) -> Result<Self, DeviceError> {
        let profile = profile_for(pid);
        let mut transport = discovery::open_pid(pid)?;
        transport.set_post_write_delay(profile.timing.post_write_delay());
        info!("Opened {} (PID 0x{pid:04x})", profile.model);
        Self::with_transport(Arc::new(transport), profile)
    }

    /// Start a session over an already-open transport.
    ///
    /// Also the seam the integration tests use to drive a scripted device.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        profile: DeviceProfile,
    ) -> Result<Self, DeviceError> {
        let identity = transport.identity().clone();
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);

        let worker = SessionWorker {
            manager: TransactionManager::new(transport, profile.status_codes, profile.timing),
            profile: profile.clone(),
            next_id: 0,
        };
        std::thread::Builder::new()
            .name("ec-session-worker".into())
            .spawn(move || block_on(worker.run(rx)))
            .expect("Failed to spawn session worker thread");

        Ok(Self {
            tx,
            identity,
            profile,
        })
    }

    /// Identity captured when the device was opened
    pub fn identify(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// The profile this session was constructed with
    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Resolve and execute an action's full command sequence.
    ///
    /// On a terminal failure the remaining commands are aborted and the
    /// error reports how many commands had already taken effect.
    pub async fn apply(&self, action: Action) -> Result<(), ApplyError> {
        match self.submit(JobKind::Apply(action)).await {
            Ok(JobReply::Applied(result)) => result,
            Ok(_) | Err(_) => Err(ApplyError::before_any(DeviceError::SessionClosed)),
        }
    }

    /// Execute a read-back probe.
    pub async fn read(&self, probe: Probe) -> Result<Reading, DeviceError> {
        match self.submit(JobKind::Read(probe)).await {
            Ok(JobReply::Value(result)) => result,
            Ok(_) | Err(_) => Err(DeviceError::SessionClosed),
        }
    }

    /// Execute a raw command verbatim. Escape hatch for protocol work; the
    /// catalog and resolver are bypassed entirely.
    pub async fn raw(&self, command: Command) -> Result<DecodedReport, DeviceError> {
        match self.submit(JobKind::Raw(command)).await {
            Ok(JobReply::Raw(result)) => result,
            Ok(_) | Err(_) => Err(DeviceError::SessionClosed),
        }
    }

    async fn submit(&self, kind: JobKind) -> Result<JobReply, DeviceError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Job {
                kind,
                reply: reply_tx,
            })
            .await
            .map_err(|_| DeviceError::SessionClosed)?;
        reply_rx.await.map_err(|_| DeviceError::SessionClosed)
    }
}

/// State owned by the worker thread
struct SessionWorker {
    manager: TransactionManager,
    profile: DeviceProfile,
    next_id: u8,
}

impl SessionWorker {
    async fn run(mut self, mut rx: mpsc::Receiver<Job>) {
        debug!("Session worker started for {}", self.profile.model);
        while let Some(job) = rx.recv().await {
            if job.reply.is_closed() {
                debug!("Skipping abandoned job before first transmission");
                continue;
            }
            let reply = match job.kind {
                JobKind::Apply(action) => JobReply::Applied(self.run_apply(&action).await),
                JobKind::Read(probe) => JobReply::Value(self.run_probe(probe).await),
                JobKind::Raw(command) => JobReply::Raw(self.run_raw(&command).await),
            };
            // Caller may have gone away mid-flight; nothing to do about it
            let _ = job.reply.send(reply);
        }
        debug!("Session worker stopped");
    }

    fn next_id(&mut self) -> u8 {
        self.next_id = self.next_id.wrapping_add(1);
        self.next_id
    }

    async fn run_apply(&mut self, action: &Action) -> Result<(), ApplyError> {
        let sequence =
            resolver::resolve(action, &self.profile).map_err(ApplyError::before_any)?;
        let total = sequence.len();
        debug!("Applying {action}: {total} commands");

        for (completed, command) in sequence.iter().enumerate() {
            let id = self.next_id();
            let response = self
                .manager
                .execute(command, id)
                .await
                .map_err(|e| ApplyError {
                    completed,
                    total,
                    source: e.into(),
                })?;
            // Set commands echo their arguments on success
            if !response.args.starts_with(&command.args) {
                warn!(
                    "{} echoed unexpected args {:02X?}",
                    catalog::name(command.class, command.id),
                    &response.args
                );
                return Err(ApplyError {
                    completed,
                    total,
                    source: DeviceError::InconsistentReply(format!(
                        "{} did not echo its arguments",
                        catalog::name(command.class, command.id)
                    )),
                });
            }
        }
        Ok(())
    }

    async fn run_probe(&mut self, probe: Probe) -> Result<Reading, DeviceError> {
        if !self.profile.supports(probe.feature()) {
            return Err(DeviceError::UnsupportedAction(format!(
                "{probe:?} is not available on {}",
                self.profile.model
            )));
        }

        match probe {
            Probe::PerfMode => {
                let mut answers = Vec::with_capacity(FanZone::ALL.len());
                for zone in FanZone::ALL {
                    let args = self
                        .query(Family::GetPerfMode, &[0x00, zone as u8, 0x00, 0x00])
                        .await?;
                    answers.push(probes::perf_from_args(&args)?);
                }
                // Both zones must agree; a split answer means an earlier
                // action was only partially applied
                let (mode, fan) = answers[0];
                if answers.iter().any(|&a| a != (mode, fan)) {
                    return Err(DeviceError::InconsistentReply(format!(
                        "fan zones disagree: {answers:?}"
                    )));
                }
                Ok(Reading::Perf { mode, fan })
            }

            Probe::FanRpm(zone) => {
                let args = self
                    .query(Family::GetFanRpm, &[0x00, zone as u8, 0x00])
                    .await?;
                Ok(Reading::FanRpm(probes::rpm_from_args(&args, zone)?))
            }

            Probe::CpuBoost => {
                let args = self
                    .query(Family::GetBoost, &[0x00, Cluster::Cpu as u8, 0x00])
                    .await?;
                let level = probes::boost_from_args(&args, Cluster::Cpu as u8)?;
                Ok(Reading::CpuBoost(CpuBoost::try_from(level)?))
            }

            Probe::GpuBoost => {
                let args = self
                    .query(Family::GetBoost, &[0x00, Cluster::Gpu as u8, 0x00])
                    .await?;
                let level = probes::boost_from_args(&args, Cluster::Gpu as u8)?;
                Ok(Reading::GpuBoost(GpuBoost::try_from(level)?))
            }

            Probe::Logo => {
                let power = self
                    .query(Family::GetLogoPower, &[0x01, 0x04, 0x00])
                    .await?;
                if !probes::logo_power_from_args(&power)? {
                    return Ok(Reading::Logo(LogoMode::Off));
                }
                let effect = self.query(Family::GetLogoMode, &[0x01, 0x04, 0x00]).await?;
                Ok(Reading::Logo(probes::logo_effect_from_args(&effect)?))
            }

            Probe::KbdBrightness => {
                let args = self
                    .query(Family::GetKbdBrightness, &[0x01, 0x05, 0x00])
                    .await?;
                args.get(2).copied().map(Reading::KbdBrightness).ok_or_else(
                    || DeviceError::InconsistentReply("brightness reply too short".into()),
                )
            }

            Probe::LightsAlwaysOn => {
                let args = self
                    .query(Family::GetLightsAlwaysOn, &[0x00, 0x00])
                    .await?;
                Ok(Reading::LightsAlwaysOn(probes::lights_always_on_from_args(
                    &args,
                )?))
            }

            Probe::BatteryCare => {
                let args = self.query(Family::GetBatteryCare, &[0x00]).await?;
                Ok(Reading::BatteryCare(probes::battery_care_from_args(&args)?))
            }
        }
    }

    async fn run_raw(&mut self, command: &Command) -> Result<DecodedReport, DeviceError> {
        let id = self.next_id();
        Ok(self.manager.execute(command, id).await?)
    }

    /// Issue one getter and return the response argument region.
    async fn query(&mut self, family: Family, args: &[u8]) -> Result<Vec<u8>, DeviceError> {
        let command = spec(family).command(args);
        let id = self.next_id();
        let response = self.manager.execute(&command, id).await?;
        Ok(response.args)
    }
}

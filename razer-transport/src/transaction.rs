//! Transaction engine: one command's request/response cycle.
//!
//! ```text
//! Built → Sent → AwaitingResponse → { Validated | TimedOut | Rejected }
//! ```
//!
//! The manager encodes a [`Command`], transmits it, then polls the device
//! for the matching response until the profile's deadline. Responses whose
//! transaction id or command selector do not match the request are stale
//! echoes and are ignored. `Busy` statuses and response checksum faults
//! re-enter the cycle a bounded number of times with a short backoff;
//! explicit firmware rejections are terminal and never retried.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{ProtocolError, TransportError};
use crate::report::{self, Command, DecodedReport};
use crate::types::{Status, StatusCodes, Timing};
use crate::Transport;

/// Terminal outcome of a failed transaction
#[derive(Error, Debug)]
pub enum TransactionError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("Command rejected by firmware (status 0x{status:02X})")]
    Rejected { status: u8 },

    #[error("Command not supported by firmware")]
    Unsupported,
}

/// Per-attempt fault classification, internal to the retry loop
enum Fault {
    Busy,
    Checksum,
    Fatal(TransactionError),
}

pub struct TransactionManager {
    transport: Arc<dyn Transport>,
    codes: StatusCodes,
    timing: Timing,
}

impl TransactionManager {
    pub fn new(transport: Arc<dyn Transport>, codes: StatusCodes, timing: Timing) -> Self {
        Self {
            transport,
            codes,
            timing,
        }
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Execute one command under the given transaction id.
    ///
    /// Sleeps are plain thread sleeps so this can run on a dedicated session
    /// worker via `futures::executor::block_on`.
    pub async fn execute(
        &self,
        command: &Command,
        transaction_id: u8,
    ) -> Result<DecodedReport, TransactionError> {
        let mut retries = 0u32;
        loop {
            match self.attempt(command, transaction_id).await {
                Ok(report) => return Ok(report),
                Err(Fault::Fatal(e)) => return Err(e),
                Err(fault @ (Fault::Busy | Fault::Checksum)) => {
                    if retries >= self.timing.busy_retries {
                        return Err(match fault {
                            Fault::Busy => TransportError::DeviceBusy.into(),
                            _ => ProtocolError::ChecksumMismatch.into(),
                        });
                    }
                    retries += 1;
                    debug!(
                        "Transient fault on 0x{:02X}{:02X}, retry {}/{}",
                        command.class, command.id, retries, self.timing.busy_retries
                    );
                    std::thread::sleep(self.timing.backoff());
                }
            }
        }
    }

    /// One send → poll cycle
    async fn attempt(&self, command: &Command, transaction_id: u8) -> Result<DecodedReport, Fault> {
        let frame = report::encode(command, transaction_id, self.codes.new)
            .map_err(|e| Fault::Fatal(e.into()))?;
        self.transport
            .write_report(&frame)
            .await
            .map_err(|e| Fault::Fatal(e.into()))?;

        let deadline = Instant::now() + self.timing.response_timeout();
        loop {
            let buf = self
                .transport
                .read_report()
                .await
                .map_err(|e| Fault::Fatal(e.into()))?;

            match report::decode(&buf) {
                Err(ProtocolError::ChecksumMismatch) => return Err(Fault::Checksum),
                Err(e) => return Err(Fault::Fatal(e.into())),
                Ok(response) => {
                    if response.transaction_id != transaction_id
                        || response.command_class != command.class
                        || response.command_id != command.id
                    {
                        debug!(
                            "Ignoring stale response (id {} for 0x{:02X}{:02X})",
                            response.transaction_id,
                            response.command_class,
                            response.command_id
                        );
                    } else if response.status == self.codes.new {
                        // Our own request echoed back unprocessed; keep polling
                    } else {
                        match self.codes.classify(response.status) {
                            Status::Accepted => return Ok(response),
                            Status::Busy => return Err(Fault::Busy),
                            Status::Failed => {
                                return Err(Fault::Fatal(TransactionError::Rejected {
                                    status: response.status,
                                }))
                            }
                            Status::Unsupported => {
                                return Err(Fault::Fatal(TransactionError::Unsupported))
                            }
                            Status::Unknown(code) => {
                                warn!("Unrecognized status byte 0x{code:02X}");
                                return Err(Fault::Fatal(TransactionError::Rejected {
                                    status: code,
                                }));
                            }
                        }
                    }
                }
            }

            if Instant::now() >= deadline {
                return Err(Fault::Fatal(TransportError::Timeout.into()));
            }
            std::thread::sleep(self.timing.poll_interval());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeviceIdentity;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    /// How the scripted device answers the next read
    #[derive(Clone, Copy)]
    enum Answer {
        /// Echo the last request with the given status byte
        Echo(u8),
        /// Echo with a corrupted transaction id
        WrongId(u8),
        /// Echo with a corrupted checksum
        BadChecksum,
        /// All-zero buffer, as if the EC had not answered yet
        Pending,
    }

    struct ScriptedDevice {
        identity: DeviceIdentity,
        queue: Mutex<VecDeque<Answer>>,
        default: Answer,
        last_request: Mutex<Option<Vec<u8>>>,
        writes: Mutex<usize>,
    }

    impl ScriptedDevice {
        fn new(script: &[Answer], default: Answer) -> Arc<Self> {
            Arc::new(Self {
                identity: DeviceIdentity {
                    vendor_id: 0x1532,
                    product_id: 0x029f,
                    path: "mock".into(),
                    serial: None,
                    product: None,
                },
                queue: Mutex::new(script.iter().copied().collect()),
                default,
                last_request: Mutex::new(None),
                writes: Mutex::new(0),
            })
        }

        fn writes(&self) -> usize {
            *self.writes.lock()
        }
    }

    #[async_trait]
    impl Transport for ScriptedDevice {
        async fn write_report(&self, frame: &[u8]) -> Result<(), TransportError> {
            *self.last_request.lock() = Some(frame.to_vec());
            *self.writes.lock() += 1;
            Ok(())
        }

        async fn read_report(&self) -> Result<Vec<u8>, TransportError> {
            let answer = self.queue.lock().pop_front().unwrap_or(self.default);
            let request = self.last_request.lock().clone().unwrap_or_default();
            let mut frame = request;
            match answer {
                Answer::Echo(status) => frame[0] = status,
                Answer::WrongId(status) => {
                    frame[0] = status;
                    frame[1] = frame[1].wrapping_add(1);
                }
                Answer::BadChecksum => {
                    frame[0] = 0x02;
                    frame[88] ^= 0xff;
                }
                Answer::Pending => frame = vec![0; report::REPORT_LEN],
            }
            Ok(frame)
        }

        fn identity(&self) -> &DeviceIdentity {
            &self.identity
        }
    }

    fn fast_timing(retries: u32) -> Timing {
        Timing {
            response_timeout_ms: 30,
            poll_interval_ms: 1,
            busy_retries: retries,
            backoff_ms: 1,
            post_write_delay_us: 0,
        }
    }

    fn manager(device: Arc<ScriptedDevice>, retries: u32) -> TransactionManager {
        TransactionManager::new(device, StatusCodes::default(), fast_timing(retries))
    }

    fn command() -> Command {
        Command::new(0x0d, 0x02, &[1, 1, 0, 0])
    }

    #[tokio::test]
    async fn accepted_response_is_returned() {
        let device = ScriptedDevice::new(&[], Answer::Echo(0x02));
        let tm = manager(Arc::clone(&device), 3);
        let report = tm.execute(&command(), 0x11).await.unwrap();
        assert_eq!(report.transaction_id, 0x11);
        assert_eq!(report.args, vec![1, 1, 0, 0]);
        assert_eq!(device.writes(), 1);
    }

    #[tokio::test]
    async fn persistent_busy_exhausts_exactly_n_retries() {
        let device = ScriptedDevice::new(&[], Answer::Echo(0x01));
        let tm = manager(Arc::clone(&device), 4);
        let err = tm.execute(&command(), 1).await.unwrap_err();
        assert!(matches!(
            err,
            TransactionError::Transport(TransportError::DeviceBusy)
        ));
        // Initial attempt plus the configured four retries
        assert_eq!(device.writes(), 5);
    }

    #[tokio::test]
    async fn stale_transaction_id_is_ignored_until_real_response() {
        let device = ScriptedDevice::new(&[Answer::WrongId(0x02)], Answer::Echo(0x02));
        let tm = manager(Arc::clone(&device), 0);
        tm.execute(&command(), 0x40).await.unwrap();
        // The stale echo must not consume a retry; a single write suffices
        assert_eq!(device.writes(), 1);
    }

    #[tokio::test]
    async fn pending_buffers_poll_until_timeout() {
        let device = ScriptedDevice::new(&[], Answer::Pending);
        let tm = manager(device, 2);
        let err = tm.execute(&command(), 1).await.unwrap_err();
        assert!(matches!(
            err,
            TransactionError::Transport(TransportError::Timeout)
        ));
    }

    #[tokio::test]
    async fn checksum_fault_is_retried_then_succeeds() {
        let device = ScriptedDevice::new(&[Answer::BadChecksum], Answer::Echo(0x02));
        let tm = manager(Arc::clone(&device), 3);
        tm.execute(&command(), 1).await.unwrap();
        assert_eq!(device.writes(), 2);
    }

    #[tokio::test]
    async fn persistent_checksum_fault_surfaces_protocol_error() {
        let device = ScriptedDevice::new(&[], Answer::BadChecksum);
        let tm = manager(Arc::clone(&device), 2);
        let err = tm.execute(&command(), 1).await.unwrap_err();
        assert!(matches!(
            err,
            TransactionError::Protocol(ProtocolError::ChecksumMismatch)
        ));
        assert_eq!(device.writes(), 3);
    }

    #[tokio::test]
    async fn firmware_rejection_is_never_retried() {
        let device = ScriptedDevice::new(&[], Answer::Echo(0x03));
        let tm = manager(Arc::clone(&device), 5);
        let err = tm.execute(&command(), 1).await.unwrap_err();
        assert!(matches!(err, TransactionError::Rejected { status: 0x03 }));
        assert_eq!(device.writes(), 1);
    }

    #[tokio::test]
    async fn unsupported_is_terminal() {
        let device = ScriptedDevice::new(&[], Answer::Echo(0x05));
        let tm = manager(Arc::clone(&device), 5);
        let err = tm.execute(&command(), 1).await.unwrap_err();
        assert!(matches!(err, TransactionError::Unsupported));
        assert_eq!(device.writes(), 1);
    }

    #[tokio::test]
    async fn unknown_status_is_surfaced_not_guessed() {
        let device = ScriptedDevice::new(&[], Answer::Echo(0x7e));
        let tm = manager(device, 5);
        let err = tm.execute(&command(), 1).await.unwrap_err();
        assert!(matches!(err, TransactionError::Rejected { status: 0x7e }));
    }
}

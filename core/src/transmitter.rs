//! V.17 transmitter: training, data and shutdown sequencing, pulse shaping and
//! carrier modulation.

use log::{debug, info};
use std::fmt;

use crate::backend::{Backend, Float};
use crate::carrier::Dds;
use crate::config::TxConfig;
use crate::constellation::{BitRate, GridPoint, ZERO_POINT};
use crate::error::{Result, V17Error};
use crate::pulse_shaper::PulseShapeBuffer;
use crate::scrambler::Scrambler;
use crate::source::{AllOnes, BitSource, StatusSink, TxStatus};
use crate::training::{Training, SHUTDOWN_A, SHUTDOWN_END, TRAINING_END};
use crate::trellis::TrellisEncoder;
use crate::{BAUD_PHASE_STEP, BAUD_PHASE_WRAP, CARRIER_NOMINAL_FREQ, DEFAULT_TX_POWER_DBM0};

/// Which source feeds the data path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSource {
    /// Internal ones, used during training and shutdown
    Fallback,
    /// The caller's bit source
    Caller,
}

/// Everything sample generation mutates, apart from the caller's capabilities
#[derive(Debug, Clone, PartialEq)]
pub struct TxState<B: Backend> {
    bit_rate: BitRate,
    scrambler: Scrambler,
    trellis: TrellisEncoder,
    training: Training,
    baud_phase: u32,
    rrc: PulseShapeBuffer<B::Point>,
    carrier: Dds,
    power_dbm0: f32,
    gain: B::Gain,
    active: ActiveSource,
}

impl<B: Backend> TxState<B> {
    fn new(bit_rate: BitRate, tep: bool, short_train: bool) -> Self {
        let mut state = Self {
            bit_rate,
            scrambler: Scrambler::new(),
            trellis: TrellisEncoder::new(0),
            training: Training::new(tep, short_train),
            baud_phase: 0,
            rrc: PulseShapeBuffer::new(),
            carrier: Dds::new(CARRIER_NOMINAL_FREQ),
            power_dbm0: DEFAULT_TX_POWER_DBM0,
            gain: B::gain(DEFAULT_TX_POWER_DBM0),
            active: ActiveSource::Fallback,
        };
        state.reset(bit_rate, tep, short_train);
        state
    }

    fn reset(&mut self, bit_rate: BitRate, tep: bool, short_train: bool) {
        self.bit_rate = bit_rate;
        self.scrambler.reset();
        // Some modems use 3 for long training
        self.trellis.reset(if short_train { 0 } else { 1 });
        self.training = Training::new(tep, short_train);
        self.baud_phase = 0;
        self.rrc.clear();
        self.carrier.reset();
        self.active = ActiveSource::Fallback;
    }

    pub fn bit_rate(&self) -> BitRate {
        self.bit_rate
    }

    pub fn scrambler(&self) -> &Scrambler {
        &self.scrambler
    }

    pub fn trellis(&self) -> &TrellisEncoder {
        &self.trellis
    }

    pub fn training(&self) -> &Training {
        &self.training
    }

    pub fn baud_phase(&self) -> u32 {
        self.baud_phase
    }

    pub fn carrier(&self) -> &Dds {
        &self.carrier
    }

    pub fn active_source(&self) -> ActiveSource {
        self.active
    }
}

/// ITU-T V.17 transmitter
///
/// Pull based: every call to [`V17Tx::produce`] pulls bits from the bit source
/// as bauds are needed, and reports milestones to the status sink as they
/// happen. Training starts immediately; the caller's bits are used once it
/// completes. When the bit source reports end of data the shutdown sequence is
/// sent, after which the transmitter produces nothing until restarted.
pub struct V17Tx<B: Backend = Float> {
    state: TxState<B>,
    source: Box<dyn BitSource>,
    status: Option<Box<dyn StatusSink>>,
}

impl<B: Backend> V17Tx<B> {
    /// Build a transmitter from a full configuration
    pub fn with_config(config: &TxConfig, source: impl BitSource + 'static) -> Result<Self> {
        let bit_rate = config.validate()?;
        let mut tx = Self {
            state: TxState::new(bit_rate, config.tep, config.short_train),
            source: Box::new(source),
            status: None,
        };
        tx.set_power(config.power_dbm0)?;
        info!(
            "V.17 transmitter ({} arithmetic) at {}, tep={}, short_train={}",
            B::NAME,
            bit_rate,
            config.tep,
            config.short_train
        );
        Ok(tx)
    }

    /// Start a new run: reload the scrambler and encoders, clear the filter and
    /// begin training again. On error the transmitter is left untouched.
    pub fn restart(&mut self, bit_rate: u32, tep: bool, short_train: bool) -> Result<()> {
        let bit_rate = BitRate::try_from(bit_rate)?;
        self.state.reset(bit_rate, tep, short_train);
        info!(
            "V.17 transmitter restart at {}, tep={}, short_train={}",
            bit_rate, tep, short_train
        );
        Ok(())
    }

    /// Set the transmit level in dBm0
    pub fn set_power(&mut self, power_dbm0: f32) -> Result<()> {
        if !power_dbm0.is_finite() {
            return Err(V17Error::InvalidConfig(format!(
                "transmit power must be finite, got {}",
                power_dbm0
            )));
        }
        self.state.power_dbm0 = power_dbm0;
        self.state.gain = B::gain(power_dbm0);
        debug!("transmit power {} dBm0, gain {:?}", power_dbm0, self.state.gain);
        Ok(())
    }

    /// Replace the caller's bit source. If data is already flowing the new
    /// source takes over from the next bit.
    pub fn set_bit_source(&mut self, source: impl BitSource + 'static) {
        self.source = Box::new(source);
    }

    pub fn set_status_sink(&mut self, sink: impl StatusSink + 'static) {
        self.status = Some(Box::new(sink));
    }

    pub fn clear_status_sink(&mut self) {
        self.status = None;
    }

    /// Tear the transmitter down
    pub fn release(self) {
        debug!(
            "V.17 transmitter released at training step {}",
            self.state.training.step()
        );
    }

    /// Fill `amp` with line samples and return how many were written.
    ///
    /// Fewer than `amp.len()` are written only when the shutdown sequence ends
    /// inside this call. Once it has ended, nothing is written and no state
    /// changes.
    pub fn produce(&mut self, amp: &mut [i16]) -> usize {
        let mut produced = 0;
        for sample in amp.iter_mut() {
            if self.is_shut_down() {
                break;
            }
            self.state.baud_phase += BAUD_PHASE_STEP;
            if self.state.baud_phase >= BAUD_PHASE_WRAP {
                self.state.baud_phase -= BAUD_PHASE_WRAP;
                let point = self.next_baud();
                self.state.rrc.push(B::point(point));
            }
            *sample = B::sample(
                self.state.rrc.span(),
                self.state.baud_phase as usize,
                &mut self.state.carrier,
                self.state.gain,
            );
            produced += 1;
        }
        produced
    }

    /// As [`V17Tx::produce`], into a new buffer trimmed to the samples written
    pub fn produce_vec(&mut self, len: usize) -> Vec<i16> {
        let mut amp = vec![0i16; len];
        let produced = self.produce(&mut amp);
        amp.truncate(produced);
        amp
    }

    /// Next baud: a training point, a trellis coded data point, or shutdown silence
    fn next_baud(&mut self) -> GridPoint {
        if self.state.training.in_training() {
            if self.state.training.step() <= TRAINING_END {
                if self.state.training.generates_points() {
                    return self.state.training.next_point(&mut self.state.scrambler);
                }
                // Segment 4: scrambled ones through the data path
                if self.state.training.advance() > TRAINING_END {
                    self.state.training.set_in_training(false);
                    self.state.active = ActiveSource::Caller;
                    info!("V.17 training complete, sending data");
                }
            } else {
                // Shutdown: 32 bauds of scrambled ones, then 48 bauds of silence
                let step = self.state.training.advance();
                if step > SHUTDOWN_A {
                    if step == SHUTDOWN_END {
                        info!("V.17 shutdown complete");
                        self.notify(TxStatus::ShutdownComplete);
                    }
                    return ZERO_POINT;
                }
            }
        }
        self.data_point()
    }

    fn data_point(&mut self) -> GridPoint {
        let mut bits = 0u32;
        for i in 0..self.state.bit_rate.bits_per_symbol() {
            let bit = self.next_bit();
            bits |= self.state.scrambler.scramble(bit) << i;
        }
        let index = self.state.trellis.encode(bits);
        self.state.bit_rate.constellation()[index]
    }

    fn next_bit(&mut self) -> u32 {
        let bit = match self.state.active {
            ActiveSource::Caller => self.source.next_bit(),
            ActiveSource::Fallback => AllOnes.next_bit(),
        };
        match bit {
            Some(bit) => bit as u32,
            None => {
                info!("V.17 end of data, sending shutdown sequence");
                self.notify(TxStatus::EndOfData);
                self.state.active = ActiveSource::Fallback;
                self.state.training.set_in_training(true);
                1
            }
        }
    }

    fn notify(&mut self, status: TxStatus) {
        if let Some(sink) = self.status.as_mut() {
            sink.status(status);
        }
    }

    pub fn state(&self) -> &TxState<B> {
        &self.state
    }

    pub fn bit_rate(&self) -> BitRate {
        self.state.bit_rate
    }

    pub fn bits_per_symbol(&self) -> usize {
        self.state.bit_rate.bits_per_symbol()
    }

    pub fn in_training(&self) -> bool {
        self.state.training.in_training()
    }

    pub fn training_step(&self) -> u32 {
        self.state.training.step()
    }

    pub fn power(&self) -> f32 {
        self.state.power_dbm0
    }

    pub fn gain(&self) -> B::Gain {
        self.state.gain
    }

    /// The shutdown sequence has been sent; [`V17Tx::produce`] writes nothing more
    pub fn is_shut_down(&self) -> bool {
        self.state.training.step() >= SHUTDOWN_END
    }
}

impl V17Tx<Float> {
    /// Floating point transmitter at -14 dBm0 with long training
    pub fn new(bit_rate: u32, tep: bool, source: impl BitSource + 'static) -> Result<Self> {
        let config = TxConfig {
            bit_rate,
            tep,
            ..TxConfig::default()
        };
        Self::with_config(&config, source)
    }
}

impl<B: Backend> fmt::Debug for V17Tx<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("V17Tx")
            .field("state", &self.state)
            .field("status_sink", &self.status.is_some())
            .finish()
    }
}

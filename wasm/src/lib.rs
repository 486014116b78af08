use wasm_bindgen::prelude::*;
use v17tx_core::{AllOnes, BitBuffer, TxConfig, V17Tx};

const RENDER_CHUNK: usize = 160;

#[wasm_bindgen]
pub struct WasmV17Tx {
    inner: V17Tx,
    config: TxConfig,
}

#[wasm_bindgen]
impl WasmV17Tx {
    #[wasm_bindgen(constructor)]
    pub fn new(bit_rate: u32, tep: bool, short_train: bool, power_dbm0: f32) -> Result<WasmV17Tx, JsValue> {
        let config = TxConfig {
            bit_rate,
            tep,
            short_train,
            power_dbm0,
        };
        V17Tx::with_config(&config, AllOnes)
            .map(|inner| WasmV17Tx { inner, config })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Transmit binary data: training, data, shutdown.
    /// Takes a Uint8Array and returns an Int16Array of 8 kHz samples
    #[wasm_bindgen]
    pub fn encode(&mut self, data: &[u8]) -> Result<Vec<i16>, JsValue> {
        self.restart()?;
        self.inner.set_bit_source(BitBuffer::from_bytes(data));
        let mut samples = Vec::new();
        loop {
            let chunk = self.inner.produce_vec(RENDER_CHUNK);
            let done = chunk.len() < RENDER_CHUNK;
            samples.extend(chunk);
            if done {
                return Ok(samples);
            }
        }
    }

    /// As `encode`, scaled to [-1, 1) for Web Audio.
    /// Returns a Float32Array
    #[wasm_bindgen(js_name = encodeF32)]
    pub fn encode_f32(&mut self, data: &[u8]) -> Result<Vec<f32>, JsValue> {
        Ok(self
            .encode(data)?
            .into_iter()
            .map(|s| s as f32 / 32768.0)
            .collect())
    }

    /// Training followed by scrambled ones, `len` samples long
    #[wasm_bindgen]
    pub fn training(&mut self, len: usize) -> Result<Vec<i16>, JsValue> {
        self.restart()?;
        self.inner.set_bit_source(AllOnes);
        Ok(self.inner.produce_vec(len))
    }

    #[wasm_bindgen(js_name = setPower)]
    pub fn set_power(&mut self, power_dbm0: f32) -> Result<(), JsValue> {
        self.inner
            .set_power(power_dbm0)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.config.power_dbm0 = power_dbm0;
        Ok(())
    }

    #[wasm_bindgen(getter, js_name = bitRate)]
    pub fn bit_rate(&self) -> u32 {
        self.inner.bit_rate().bps()
    }

    #[wasm_bindgen(getter, js_name = sampleRate)]
    pub fn sample_rate(&self) -> u32 {
        v17tx_core::SAMPLE_RATE
    }

    fn restart(&mut self) -> Result<(), JsValue> {
        self.inner
            .restart(self.config.bit_rate, self.config.tep, self.config.short_train)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_runs_to_shutdown() {
        let mut tx = WasmV17Tx::new(9600, false, false, -14.0).unwrap();
        let first = tx.encode(b"wasm").unwrap();
        assert!(first.len() > 11_000);
        assert_eq!(*first.last().unwrap(), 0);

        // Each call is a complete, independent transmission
        let second = tx.encode(b"wasm").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_training_length() {
        let mut tx = WasmV17Tx::new(14400, true, false, -14.0).unwrap();
        assert_eq!(tx.training(8000).unwrap().len(), 8000);
        assert_eq!(tx.bit_rate(), 14400);
        assert_eq!(tx.sample_rate(), 8000);
    }

    #[test]
    fn test_encode_f32_is_normalised() {
        let mut tx = WasmV17Tx::new(7200, false, false, -14.0).unwrap();
        let samples = tx.encode_f32(&[0xA5; 8]).unwrap();
        assert!(samples.iter().all(|s| (-1.0..1.0).contains(s)));
    }
}

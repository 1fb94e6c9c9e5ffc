//! Last-known telemetry values

use pcmon_protocol::{Field, Readings};

/// Most recent value of every field the host can send
///
/// Fields start at zero and are only ever overwritten by a line that
/// carries them; a partial line leaves the other fields untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetrySample {
    /// CPU temperature (°C)
    pub cpu_temp: f32,
    /// CPU load (%)
    pub cpu_load: f32,
    /// GPU temperature (°C)
    pub gpu_temp: f32,
    /// GPU load (%)
    pub gpu_load: f32,
    /// RAM usage (%)
    pub ram_usage: f32,
}

impl TelemetrySample {
    pub const fn new() -> Self {
        Self {
            cpu_temp: 0.0,
            cpu_load: 0.0,
            gpu_temp: 0.0,
            gpu_load: 0.0,
            ram_usage: 0.0,
        }
    }

    /// Current value of `field`
    pub fn get(&self, field: Field) -> f32 {
        match field {
            Field::CpuTemp => self.cpu_temp,
            Field::CpuLoad => self.cpu_load,
            Field::GpuTemp => self.gpu_temp,
            Field::GpuLoad => self.gpu_load,
            Field::RamUsage => self.ram_usage,
        }
    }

    fn slot(&mut self, field: Field) -> &mut f32 {
        match field {
            Field::CpuTemp => &mut self.cpu_temp,
            Field::CpuLoad => &mut self.cpu_load,
            Field::GpuTemp => &mut self.gpu_temp,
            Field::GpuLoad => &mut self.gpu_load,
            Field::RamUsage => &mut self.ram_usage,
        }
    }

    /// Overwrite the fields present in `readings`
    pub fn apply(&mut self, readings: &Readings) {
        for (field, value) in readings.iter() {
            *self.slot(field) = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_zero() {
        let sample = TelemetrySample::new();
        for field in Field::ALL {
            assert_eq!(sample.get(field), 0.0);
        }
        assert_eq!(sample, TelemetrySample::default());
    }

    #[test]
    fn test_apply_partial_update_keeps_other_fields() {
        let mut sample = TelemetrySample::new();
        let mut readings = Readings::new();
        readings.set(Field::CpuTemp, 40.0);
        readings.set(Field::RamUsage, 33.0);
        sample.apply(&readings);

        let mut second = Readings::new();
        second.set(Field::CpuTemp, 41.5);
        sample.apply(&second);

        assert_eq!(sample.cpu_temp, 41.5);
        assert_eq!(sample.ram_usage, 33.0);
        assert_eq!(sample.cpu_load, 0.0);
    }
}

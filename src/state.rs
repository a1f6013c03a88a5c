// state.rs

use crate::*;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Latest reading and the alarm threshold, exactly as served by `/api/get_data`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SensorState {
    pub temperature: f64,
    pub humidity: f64,
    pub threshold: f64,
}

impl SensorState {
    pub fn new(threshold: f64) -> Self {
        SensorState {
            temperature: 0.0,
            humidity: 0.0,
            threshold,
        }
    }

    pub fn buzzer(&self) -> BuzzerState {
        BuzzerState::decide(self.temperature, self.threshold)
    }
}

#[derive(Debug)]
struct SensorData {
    current: SensorState,
    last_update: Option<DateTime<Local>>,
}

/// What the index page shows.
#[derive(Clone, Debug)]
pub struct StatusView {
    pub state: SensorState,
    pub buzzer: BuzzerState,
    pub last_update: String,
}

pub struct MyState {
    pub config: MyConfig,
    pub api_cnt: AtomicU64,
    started: Instant,
    data: RwLock<SensorData>,
}

impl MyState {
    pub fn new(config: MyConfig) -> Self {
        let current = SensorState::new(config.threshold);
        MyState {
            config,
            api_cnt: AtomicU64::new(0),
            started: Instant::now(),
            data: RwLock::new(SensorData {
                current,
                last_update: None,
            }),
        }
    }

    /// Stores the reading and decides the buzzer against the threshold seen
    /// under the same write lock.
    pub async fn report_reading(&self, m: Measurement) -> BuzzerState {
        let buzzer = {
            let mut data = self.data.write().await;
            data.current.temperature = m.temperature;
            data.current.humidity = m.humidity;
            data.last_update = Some(Local::now());
            data.current.buzzer()
        };
        info!(
            "Received temp: {t}°C, humidity: {h}%, buzzer state: {buzzer}",
            t = m.temperature,
            h = m.humidity
        );
        buzzer
    }

    pub async fn get_state(&self) -> SensorState {
        self.data.read().await.current
    }

    pub async fn set_threshold(&self, threshold: f64) -> f64 {
        self.data.write().await.current.threshold = threshold;
        info!("Threshold updated to: {threshold}°C");
        threshold
    }

    pub async fn status(&self) -> StatusView {
        let data = self.data.read().await;
        StatusView {
            state: data.current,
            buzzer: data.current.buzzer(),
            last_update: data
                .last_update
                .map(|t| t.format(TIME_FORMAT).to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }

    pub fn uptime(&self) -> Uptime {
        let secs = self.started.elapsed().as_secs();
        Uptime {
            uptime: secs,
            uptime_s: format_uptime(secs),
        }
    }
}

pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;
    format!("{days}d {hours:02}:{mins:02}:{secs:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_threshold(threshold: f64) -> MyState {
        MyState::new(MyConfig {
            threshold,
            ..MyConfig::default()
        })
    }

    #[tokio::test]
    async fn defaults_before_any_update() {
        let state = state_with_threshold(35.0);
        assert_eq!(state.get_state().await, SensorState::new(35.0));
        let status = state.status().await;
        assert_eq!(status.buzzer, BuzzerState::Off);
        assert_eq!(status.last_update, "-");
    }

    #[tokio::test]
    async fn buzzer_is_on_at_and_above_threshold() {
        let state = state_with_threshold(35.0);
        assert_eq!(
            state.report_reading(Measurement::new(34.99, 40.0)).await,
            BuzzerState::Off
        );
        assert_eq!(
            state.report_reading(Measurement::new(35.0, 40.0)).await,
            BuzzerState::On
        );
        assert_eq!(
            state.report_reading(Measurement::new(36.0, 50.0)).await,
            BuzzerState::On
        );
        assert_eq!(
            state.get_state().await,
            SensorState {
                temperature: 36.0,
                humidity: 50.0,
                threshold: 35.0
            }
        );
        assert_ne!(state.status().await.last_update, "-");
    }

    #[tokio::test]
    async fn lowered_threshold_applies_to_next_reading() {
        let state = state_with_threshold(35.0);
        assert_eq!(state.set_threshold(20.0).await, 20.0);
        assert_eq!(state.get_state().await.threshold, 20.0);
        assert_eq!(
            state.report_reading(Measurement::new(25.0, 40.0)).await,
            BuzzerState::On
        );
    }

    #[tokio::test]
    async fn concurrent_writers_leave_a_consistent_record() {
        let state = Arc::new(state_with_threshold(30.0));
        let mut tasks = Vec::new();
        for i in 0..32 {
            let state = state.clone();
            tasks.push(tokio::spawn(async move {
                let t = i as f64;
                state.report_reading(Measurement::new(t, t)).await
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        let snap = state.get_state().await;
        assert_eq!(snap.temperature, snap.humidity);
        assert_eq!(snap.threshold, 30.0);
    }

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(0), "0d 00:00:00");
        assert_eq!(format_uptime(93_784), "1d 02:03:04");
    }
}

// EOF

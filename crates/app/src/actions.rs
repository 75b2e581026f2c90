//! Actions: the handler bodies behind each trigger kind.
//!
//! Device names are routed through an [`Inventory`] of configured lights
//! and switches. Calls into the device services are made one at a time;
//! a failing call is logged and the remaining devices are still handled.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use geppetto_domain::solar::{Location, SolarAltitude, solar_lighting};

use crate::handlers::{HandlerError, HandlerSlot, HandlerTable};
use crate::ports::{Clock, DeviceError, LightPort, LightState, SwitchPort};

/// `bright`: full brightness at a warm 2500 K over a minute.
const BRIGHT_STATE: LightState = LightState {
    brightness: Some(1.0),
    kelvin: Some(2500),
    color: None,
    duration: Some(60),
};

/// Transition time for `sunlight` updates, in seconds.
const SUNLIGHT_DURATION: u32 = 45;

/// `wakeup` starts from a barely lit warm light...
const WAKEUP_START: LightState = LightState {
    brightness: Some(0.01),
    kelvin: Some(2500),
    color: None,
    duration: Some(0),
};

/// ...and ramps up to full daylight over fifteen minutes.
const WAKEUP_END: LightState = LightState {
    brightness: Some(1.0),
    kelvin: Some(4000),
    color: None,
    duration: Some(900),
};

/// Errors reported back to the scheduler.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("{0} is not a configured light or switch")]
    UnknownDevice(String),
}

/// Names of the configured lights and switches.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    lights: HashSet<String>,
    switches: HashSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Light,
    Switch,
}

impl Inventory {
    pub fn new<I, J>(lights: I, switches: J) -> Self
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        Self {
            lights: lights.into_iter().collect(),
            switches: switches.into_iter().collect(),
        }
    }

    /// Lights win when a name is listed as both.
    fn target(&self, name: &str) -> Option<Target> {
        if self.lights.contains(name) {
            Some(Target::Light)
        } else if self.switches.contains(name) {
            Some(Target::Switch)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Power {
    On,
    Off,
}

/// Stock implementation of every handler slot.
pub struct Actions<L, S, A, C> {
    lights: L,
    switches: S,
    inventory: Inventory,
    location: Location,
    solar: A,
    clock: C,
}

impl<L, S, A, C> Actions<L, S, A, C>
where
    L: LightPort + 'static,
    S: SwitchPort + 'static,
    A: SolarAltitude + Send + Sync + 'static,
    C: Clock + 'static,
{
    pub fn new(
        lights: L,
        switches: S,
        inventory: Inventory,
        location: Location,
        solar: A,
        clock: C,
    ) -> Self {
        Self {
            lights,
            switches,
            inventory,
            location,
            solar,
            clock,
        }
    }

    /// Power on each named light or switch.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownDevice`] at the first name that is in
    /// neither inventory list; later names are not handled.
    #[tracing::instrument(skip(self))]
    pub async fn power_on(&self, devices: &[String]) -> Result<(), ActionError> {
        self.power(devices, Power::On).await
    }

    /// Power off each named light or switch.
    ///
    /// # Errors
    ///
    /// Same as [`Actions::power_on`].
    #[tracing::instrument(skip(self))]
    pub async fn power_off(&self, devices: &[String]) -> Result<(), ActionError> {
        self.power(devices, Power::Off).await
    }

    async fn power(&self, devices: &[String], power: Power) -> Result<(), ActionError> {
        for device in devices {
            let result = match (self.target(device)?, power) {
                (Target::Light, Power::On) => self.lights.power_on(device).await,
                (Target::Light, Power::Off) => self.lights.power_off(device).await,
                (Target::Switch, Power::On) => self.switches.power_on(device).await,
                (Target::Switch, Power::Off) => self.switches.power_off(device).await,
            };
            report(device, "power", result);
        }
        Ok(())
    }

    /// Set each light to full warm brightness.
    #[tracing::instrument(skip(self))]
    pub async fn bright(&self, lights: &[String]) {
        for light in lights {
            let result = self.lights.set_state(light, &BRIGHT_STATE).await;
            report(light, "set_state", result);
        }
    }

    /// Match each light to the sun's current position.
    ///
    /// Nothing is sent when the position cannot be computed.
    #[tracing::instrument(skip(self))]
    pub async fn sunlight(&self, lights: &[String]) {
        let lighting = match solar_lighting(&self.solar, self.location, self.clock.utc()) {
            Ok(lighting) => lighting,
            Err(err) => {
                tracing::warn!(error = %err, "skipping sunlight update");
                return;
            }
        };
        tracing::debug!(
            kelvin = lighting.kelvin,
            brightness = lighting.brightness_pct,
            "sunlight computed"
        );

        let state = LightState {
            brightness: Some(f64::from(lighting.brightness_pct)),
            kelvin: Some(lighting.kelvin),
            color: None,
            duration: Some(SUNLIGHT_DURATION),
        };
        for light in lights {
            let result = self.lights.set_state(light, &state).await;
            report(light, "set_state", result);
        }
    }

    /// Fade lights in from a dim glow; named switches are just powered on.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownDevice`] at the first unknown name.
    #[tracing::instrument(skip(self))]
    pub async fn wakeup(&self, devices: &[String]) -> Result<(), ActionError> {
        for device in devices {
            match self.target(device)? {
                Target::Light => {
                    let result = self.lights.set_state(device, &WAKEUP_START).await;
                    report(device, "set_state", result);
                    let result = self.lights.power_on(device).await;
                    report(device, "power", result);
                    let result = self.lights.set_state(device, &WAKEUP_END).await;
                    report(device, "set_state", result);
                }
                Target::Switch => {
                    let result = self.switches.power_on(device).await;
                    report(device, "power", result);
                }
            }
        }
        Ok(())
    }

    fn target(&self, device: &str) -> Result<Target, ActionError> {
        self.inventory.target(device).ok_or_else(|| {
            tracing::error!(device, "device is not configured, skipping the rest");
            ActionError::UnknownDevice(device.to_string())
        })
    }

    /// Bind every handler slot in `table` to these actions.
    pub fn bind(this: &Arc<Self>, table: &mut HandlerTable) {
        Self::bind_slot(this, table, HandlerSlot::EventPowerOn, |actions, devices| async move {
            actions.power_on(&devices).await
        });
        Self::bind_slot(this, table, HandlerSlot::EventPowerOff, |actions, devices| async move {
            actions.power_off(&devices).await
        });
        Self::bind_slot(this, table, HandlerSlot::EventWakeup, |actions, devices| async move {
            actions.wakeup(&devices).await
        });
        Self::bind_slot(this, table, HandlerSlot::ScheduleBright, |actions, lights| async move {
            actions.bright(&lights).await;
            Ok::<_, ActionError>(())
        });
        Self::bind_slot(this, table, HandlerSlot::ScheduleSunlight, |actions, lights| async move {
            actions.sunlight(&lights).await;
            Ok::<_, ActionError>(())
        });
    }

    fn bind_slot<F, Fut>(this: &Arc<Self>, table: &mut HandlerTable, slot: HandlerSlot, action: F)
    where
        F: Fn(Arc<Self>, Vec<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        let actions = Arc::clone(this);
        table.bind(slot, move |devices| {
            let run = action(Arc::clone(&actions), devices);
            async move { run.await.map_err(HandlerError::from) }
        });
    }
}

fn report(device: &str, command: &str, result: Result<(), DeviceError>) {
    if let Err(err) = result {
        tracing::warn!(device, command, error = %err, "device call failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{NaiveDate, Timelike};
    use geppetto_domain::error::SolarError;
    use geppetto_domain::time::Timestamp;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        LightOn(String),
        LightOff(String),
        LightState(String, LightState),
        SwitchOn(String),
        SwitchOff(String),
    }

    /// Records every call; names in `failing` answer with a 500.
    #[derive(Clone, Default)]
    struct Spy {
        calls: Arc<Mutex<Vec<Call>>>,
        failing: Arc<HashSet<String>>,
    }

    impl Spy {
        fn failing(names: &[&str]) -> Self {
            Self {
                failing: Arc::new(names.iter().map(ToString::to_string).collect()),
                ..Self::default()
            }
        }

        fn push(&self, name: &str, call: Call) -> Result<(), DeviceError> {
            self.calls.lock().unwrap().push(call);
            if self.failing.contains(name) {
                Err(DeviceError::Status(500))
            } else {
                Ok(())
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl LightPort for Spy {
        async fn power_on(&self, light: &str) -> Result<(), DeviceError> {
            self.push(light, Call::LightOn(light.to_string()))
        }

        async fn power_off(&self, light: &str) -> Result<(), DeviceError> {
            self.push(light, Call::LightOff(light.to_string()))
        }

        async fn toggle_power(&self, _light: &str) -> Result<(), DeviceError> {
            unreachable!("actions never toggle")
        }

        async fn set_state(&self, light: &str, state: &LightState) -> Result<(), DeviceError> {
            self.push(light, Call::LightState(light.to_string(), state.clone()))
        }
    }

    impl SwitchPort for Spy {
        async fn power_on(&self, device: &str) -> Result<(), DeviceError> {
            self.push(device, Call::SwitchOn(device.to_string()))
        }

        async fn power_off(&self, device: &str) -> Result<(), DeviceError> {
            self.push(device, Call::SwitchOff(device.to_string()))
        }

        async fn toggle_power(&self, _device: &str) -> Result<(), DeviceError> {
            unreachable!("actions never toggle")
        }
    }

    /// 60 degrees at 12:00 UTC, 30 degrees otherwise.
    fn fixed_sun(_longitude: f64, _latitude: f64, at: Timestamp) -> f64 {
        if at.hour() == 12 { 60.0 } else { 30.0 }
    }

    type TestActions = Actions<Spy, Spy, fn(f64, f64, Timestamp) -> f64, ManualClock>;

    fn actions(spy: &Spy) -> TestActions {
        let clock = ManualClock::new(
            NaiveDate::from_ymd_opt(2024, 6, 21)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        );
        Actions::new(
            spy.clone(),
            spy.clone(),
            Inventory::new(
                ["kitchen".to_string(), "hall".to_string()],
                ["coffee".to_string()],
            ),
            Location {
                longitude: 18.07,
                latitude: 59.33,
            },
            fixed_sun as fn(f64, f64, Timestamp) -> f64,
            clock,
        )
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn should_route_power_to_lights_and_switches() {
        let spy = Spy::default();
        let actions = actions(&spy);

        actions.power_on(&names(&["kitchen", "coffee"])).await.unwrap();
        actions.power_off(&names(&["coffee", "hall"])).await.unwrap();

        assert_eq!(
            spy.calls(),
            vec![
                Call::LightOn("kitchen".into()),
                Call::SwitchOn("coffee".into()),
                Call::SwitchOff("coffee".into()),
                Call::LightOff("hall".into()),
            ]
        );
    }

    #[tokio::test]
    async fn should_stop_at_unknown_device() {
        let spy = Spy::default();
        let actions = actions(&spy);

        let err = actions
            .power_on(&names(&["kitchen", "garage", "hall"]))
            .await
            .unwrap_err();

        assert!(matches!(err, ActionError::UnknownDevice(ref name) if name == "garage"));
        assert_eq!(spy.calls(), vec![Call::LightOn("kitchen".into())]);
    }

    #[tokio::test]
    async fn should_continue_after_device_failure() {
        let spy = Spy::failing(&["kitchen"]);
        let actions = actions(&spy);

        actions.power_off(&names(&["kitchen", "hall"])).await.unwrap();

        assert_eq!(spy.calls().len(), 2);
    }

    #[tokio::test]
    async fn should_set_bright_state() {
        let spy = Spy::default();
        let actions = actions(&spy);

        actions.bright(&names(&["hall"])).await;

        assert_eq!(
            spy.calls(),
            vec![Call::LightState(
                "hall".into(),
                LightState {
                    brightness: Some(1.0),
                    kelvin: Some(2500),
                    color: None,
                    duration: Some(60),
                }
            )]
        );
    }

    #[tokio::test]
    async fn should_set_sunlight_from_solar_altitude() {
        let spy = Spy::default();
        let actions = actions(&spy);

        actions.sunlight(&names(&["hall", "kitchen"])).await;

        let expected = LightState {
            brightness: Some(75.0),
            kelvin: Some(3500),
            color: None,
            duration: Some(45),
        };
        assert_eq!(
            spy.calls(),
            vec![
                Call::LightState("hall".into(), expected.clone()),
                Call::LightState("kitchen".into(), expected),
            ]
        );
    }

    struct NoSun;

    impl SolarAltitude for NoSun {
        fn altitude(&self, _: f64, _: f64, _: Timestamp) -> Result<f64, SolarError> {
            Err(SolarError("latitude out of range".to_string()))
        }
    }

    #[tokio::test]
    async fn should_skip_sunlight_when_position_unavailable() {
        let spy = Spy::default();
        let actions = Actions::new(
            spy.clone(),
            spy.clone(),
            Inventory::default(),
            Location::default(),
            NoSun,
            ManualClock::new(
                NaiveDate::from_ymd_opt(2024, 6, 21)
                    .unwrap()
                    .and_hms_opt(8, 0, 0)
                    .unwrap(),
            ),
        );

        actions.sunlight(&names(&["hall"])).await;

        assert!(spy.calls().is_empty());
    }

    #[tokio::test]
    async fn should_fade_in_lights_on_wakeup() {
        let spy = Spy::default();
        let actions = actions(&spy);

        actions.wakeup(&names(&["hall", "coffee"])).await.unwrap();

        let calls = spy.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], Call::LightState("hall".into(), WAKEUP_START));
        assert_eq!(calls[1], Call::LightOn("hall".into()));
        assert_eq!(calls[2], Call::LightState("hall".into(), WAKEUP_END));
        assert_eq!(calls[3], Call::SwitchOn("coffee".into()));
    }

    #[tokio::test]
    async fn should_bind_every_slot() {
        let spy = Spy::default();
        let actions = Arc::new(actions(&spy));
        let mut table = HandlerTable::new();

        Actions::bind(&actions, &mut table);

        for slot in HandlerSlot::ALL {
            assert!(table.is_bound(slot), "{slot} unbound");
        }
        table
            .invoke(HandlerSlot::EventPowerOff, names(&["kitchen"]))
            .unwrap()
            .await
            .unwrap();
        let err = table
            .invoke(HandlerSlot::EventPowerOn, names(&["garage"]))
            .unwrap()
            .await
            .unwrap_err();

        assert_eq!(spy.calls(), vec![Call::LightOff("kitchen".into())]);
        assert_eq!(err.to_string(), "garage is not a configured light or switch");
    }
}

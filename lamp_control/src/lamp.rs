use crate::state::LightState;

mod sealed {
    pub trait Sealed {}

    impl Sealed for crate::table_lamp::TableLamp<'_> {}
    impl Sealed for crate::flashlight::FlashLight<'_> {}
}

/// What every lamp can do. Implemented only by [crate::table_lamp::TableLamp] and
/// [crate::flashlight::FlashLight].
pub trait Lamp: sealed::Sealed {
    /// Flips the light, if the lamp allows it right now
    fn toggle(&self);
    fn light_state(&self) -> LightState;
    fn name(&self) -> &'static str;
}

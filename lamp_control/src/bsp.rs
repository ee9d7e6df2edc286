pub mod pin {
    /// A pin (of a button) which may be down (tied to the ground) or up (floating pin)
    pub trait Pin {
        fn is_down(&self) -> bool;
    }
}

pub mod indicator {
    use crate::notification::Notification;

    /// Whatever shows the user what the lamps are doing: a log, a status LED, a screen.
    pub trait Indicator {
        fn notify(&self, notification: Notification);
    }
}

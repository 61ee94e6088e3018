/// The visual/interaction state a control is in for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControlState {
    #[default]
    Default,
    Targeted,
    Interacted,
    Checked,
    TargetedChecked,
    Disabled,
    DisabledChecked,
}

impl ControlState {
    pub const ALL: [ControlState; 7] = [
        ControlState::Default,
        ControlState::Targeted,
        ControlState::Interacted,
        ControlState::Checked,
        ControlState::TargetedChecked,
        ControlState::Disabled,
        ControlState::DisabledChecked,
    ];

    /// Order in which stylesheet bags are consulted for a missing property.
    ///
    /// Always starts with `self` and always ends with `Default`.
    pub const fn fallback_chain(self) -> &'static [ControlState] {
        use ControlState::*;
        match self {
            Default => &[Default],
            Targeted => &[Targeted, Default],
            Interacted => &[Interacted, Default],
            Checked => &[Checked, Interacted, Default],
            TargetedChecked => &[TargetedChecked, Checked, Interacted, Default],
            Disabled => &[Disabled, Default],
            DisabledChecked => &[DisabledChecked, Disabled, Default],
        }
    }

    /// Key used for this state in stylesheet files.
    pub const fn key(self) -> &'static str {
        match self {
            ControlState::Default => "default",
            ControlState::Targeted => "targeted",
            ControlState::Interacted => "interacted",
            ControlState::Checked => "checked",
            ControlState::TargetedChecked => "targeted_checked",
            ControlState::Disabled => "disabled",
            ControlState::DisabledChecked => "disabled_checked",
        }
    }

    #[inline]
    pub const fn is_checked(self) -> bool {
        matches!(self, ControlState::Checked | ControlState::TargetedChecked | ControlState::DisabledChecked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_chain_starts_with_self_and_ends_with_default() {
        for state in ControlState::ALL {
            let chain = state.fallback_chain();
            assert_eq!(chain[0], state);
            assert_eq!(*chain.last().unwrap(), ControlState::Default);
        }
    }

    #[test]
    fn targeted_checked_chain_order() {
        assert_eq!(
            ControlState::TargetedChecked.fallback_chain(),
            &[
                ControlState::TargetedChecked,
                ControlState::Checked,
                ControlState::Interacted,
                ControlState::Default
            ]
        );
    }
}

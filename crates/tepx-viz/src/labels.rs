use tepx_core::Observable;

/// Titles of a plot's x and y axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisTitles {
    /// Horizontal axis.
    pub x: String,
    /// Vertical axis.
    pub y: String,
}

/// Axis titles of the per-bucket graph of `observable`.
pub fn bucket_axes(observable: Observable) -> AxisTitles {
    match observable {
        Observable::Clusters => {
            AxisTitles { x: "Pileup".into(), y: "Statistical Error [%]".into() }
        }
        Observable::Hits => AxisTitles { x: "Pileup".into(), y: "# of Hits".into() },
        Observable::Coincidences(n) => AxisTitles {
            x: "<N_PU>".into(),
            y: format!("Number of {n}x Coincidences"),
        },
    }
}

/// Axis titles of a deviation-from-linearity graph.
pub fn deviation_axes() -> AxisTitles {
    AxisTitles { x: "PU".into(), y: "Diff [%]".into() }
}

/// Axis titles of radial distributions.
pub fn radial_axes() -> AxisTitles {
    AxisTitles { x: "r [cm]".into(), y: "Clusters".into() }
}

/// Axis titles of z–r density maps.
pub fn zr_axes() -> AxisTitles {
    AxisTitles { x: "z [cm]".into(), y: "r [cm]".into() }
}

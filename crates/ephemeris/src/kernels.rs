use std::path::{Path, PathBuf};

/// Location where the SPICE-backed provider expects its kernels to live.
pub const LOCAL_SPICE_DIR: &str = "data/spice";

/// Metadata describing a SPICE kernel the tour relies on.
#[derive(Debug, Clone, Copy)]
pub struct KernelDescriptor {
    pub filename: &'static str,
}

impl KernelDescriptor {
    /// Returns the on-disk path where the kernel should reside.
    pub fn local_path(self) -> PathBuf {
        Path::new(LOCAL_SPICE_DIR).join(self.filename)
    }
}

/// Kernel set covering the planets and the moons visited by the reference tour.
pub const KERNEL_CATALOG: &[KernelDescriptor] = &[
    KernelDescriptor { filename: "de440s.bsp" },
    KernelDescriptor { filename: "mar099.bsp" },
    KernelDescriptor { filename: "jup365.bsp" },
    KernelDescriptor { filename: "sat441.bsp" },
    KernelDescriptor { filename: "ura111.bsp" },
    KernelDescriptor { filename: "nep097.bsp" },
    KernelDescriptor { filename: "naif0012.tls" },
    KernelDescriptor { filename: "pck00011.tpc" },
];

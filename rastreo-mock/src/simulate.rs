use rand::Rng;
use rand::seq::SliceRandom;
use rastreo_api::{DeviceRecord, Sucursal, Tracking, Usuario};

const MINUTE: i64 = 60 * 1000;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

const BRANCHES: [(&str, &str); 4] = [
    ("Casa Central", "001"),
    ("Sucursal Luque", "002"),
    ("Sucursal San Lorenzo", "003"),
    ("Sucursal Encarnación", "004"),
];

const SALESPEOPLE: [&str; 8] = [
    "Ana Benítez",
    "Carlos Ruiz",
    "María González",
    "Luis Ortiz",
    "Rosa Giménez",
    "Jorge Acosta",
    "Lucía Franco",
    "Pedro Villalba",
];

const MODELS: [&str; 5] = ["SM-A135M-R58T", "XT2235-3-ZY22", "RMX3630-X9K", "2201117TL-22A", "SM-A042M-C1"];

const NETWORKS: [&str; 3] = ["4G", "WIFI", "3G"];

/// Around Asunción.
const CENTER: (f64, f64) = (-25.2637, -57.5759);

/// Signal profile of a simulated device, cycled through the fleet so every
/// badge shows up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Profile {
    /// Recent capture with GPS on
    Live,
    /// Recent capture, GPS off, battery and model known
    Quiet,
    /// Recent capture with only a network type and a `null` battery
    Weak,
    /// Last capture days ago
    Stale,
    /// Never reported
    Silent,
}

impl Profile {
    fn of(index: usize) -> Self {
        match index % 5 {
            0 => Profile::Live,
            1 => Profile::Quiet,
            2 => Profile::Weak,
            3 => Profile::Stale,
            _ => Profile::Silent,
        }
    }
}

pub fn fleet(count: usize, now_millis: i64, rng: &mut impl Rng) -> Vec<DeviceRecord> {
    (0..count).map(|index| device(index, now_millis, rng)).collect()
}

pub fn device(index: usize, now_millis: i64, rng: &mut impl Rng) -> DeviceRecord {
    let profile = Profile::of(index);
    let codtracking = Some(format!("{}", 10_000 + index));

    if profile == Profile::Silent {
        return DeviceRecord {
            codtracking,
            inzona: false,
            tracking: None,
        };
    }

    let age = match profile {
        Profile::Live => rng.gen_range(0..15 * MINUTE),
        Profile::Quiet => rng.gen_range(MINUTE..6 * HOUR),
        Profile::Weak => rng.gen_range(HOUR..23 * HOUR),
        _ => rng.gen_range(DAY..5 * DAY),
    };

    let (branch, code) = BRANCHES[index % BRANCHES.len()];
    let bateria = match profile {
        Profile::Weak => None,
        _ => Some(rng.gen_range(3..=100)),
    };

    DeviceRecord {
        codtracking: codtracking.clone(),
        inzona: rng.gen_bool(0.6),
        tracking: Some(Tracking {
            codtracking,
            fechacaptura: Some(now_millis - age),
            gpsactivo: Some(profile == Profile::Live),
            bateria: Some(bateria),
            imei: (profile != Profile::Weak).then(|| pick(&MODELS, rng)),
            tipored: Some(pick(&NETWORKS, rng)),
            nrotelefono: rng.gen_bool(0.9).then(|| phone(rng)),
            latitud: Some(CENTER.0 + rng.gen_range(-0.08..0.08)),
            longitud: Some(CENTER.1 + rng.gen_range(-0.08..0.08)),
            usuario: Some(Usuario {
                nombrepersona: Some(SALESPEOPLE[index % SALESPEOPLE.len()].to_string()),
                sucursal: Some(Sucursal {
                    nombresucursal: Some(branch.to_string()),
                    codsucursalerp: Some(code.to_string()),
                }),
            }),
        }),
    }
}

fn pick(options: &[&str], rng: &mut impl Rng) -> String {
    options.choose(rng).copied().unwrap_or_default().to_string()
}

/// Mobile numbers with and without the leading zero.
fn phone(rng: &mut impl Rng) -> String {
    let subscriber = rng.gen_range(100_000..1_000_000);
    let prefix = ["981", "982", "971", "991"].choose(rng).copied().unwrap_or("981");

    if rng.gen_bool(0.5) {
        format!("0{prefix}{subscriber}")
    } else {
        format!("{prefix}{subscriber}")
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    const NOW: i64 = 1_750_000_000_000;

    #[test]
    fn test_profiles_cycle_through_fleet() {
        let mut rng = StdRng::seed_from_u64(7);
        let fleet = fleet(10, NOW, &mut rng);

        assert_eq!(fleet.len(), 10);
        assert!(fleet[4].tracking.is_none());
        assert!(fleet[9].tracking.is_none());

        let live = fleet[0].tracking.as_ref().unwrap();
        assert_eq!(live.gpsactivo, Some(true));
        assert!(NOW - live.fechacaptura.unwrap() < 15 * MINUTE);

        let weak = fleet[2].tracking.as_ref().unwrap();
        assert_eq!(weak.bateria, Some(None));
        assert!(weak.imei.is_none());

        let stale = fleet[3].tracking.as_ref().unwrap();
        assert!(NOW - stale.fechacaptura.unwrap() >= DAY);
    }

    #[test]
    fn test_same_seed_same_fleet() {
        let first = fleet(6, NOW, &mut StdRng::seed_from_u64(42));
        let second = fleet(6, NOW, &mut StdRng::seed_from_u64(42));

        assert_eq!(first, second);
    }

    #[test]
    fn test_phone_lengths() {
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..20 {
            let number = phone(&mut rng);
            assert!(number.len() == 9 || number.len() == 10, "{number}");
        }
    }
}

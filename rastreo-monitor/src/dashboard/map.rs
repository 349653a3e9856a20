use rastreo_api::MapLocation;

pub const MAP_TITLE: &str = "Ubicación del Dispositivo";

/// Half-width of the embedded map's bounding box, in degrees.
const SPAN: f64 = 0.01;

/// OpenStreetMap embed URL centered on the location, with a marker on it.
pub fn embed_url(location: MapLocation) -> String {
    let MapLocation { latitud, longitud } = location;

    format!(
        "https://www.openstreetmap.org/export/embed.html?bbox={}%2C{}%2C{}%2C{}&layer=mapnik&marker={}%2C{}",
        longitud - SPAN,
        latitud - SPAN,
        longitud + SPAN,
        latitud + SPAN,
        latitud,
        longitud,
    )
}

/// Full-page map link for opening in a browser.
pub fn browse_url(location: MapLocation) -> String {
    format!(
        "https://www.openstreetmap.org/?mlat={0}&mlon={1}#map=16/{0}/{1}",
        location.latitud, location.longitud
    )
}

pub fn coordinates_label(location: MapLocation) -> String {
    format!("Lat: {:.6}, Long: {:.6}", location.latitud, location.longitud)
}

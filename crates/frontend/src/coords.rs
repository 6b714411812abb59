use atlas_shared::grid;

/// Pure function: convert container-relative coordinates to native atlas pixels,
/// undoing zoom/pan CSS transform. Usable in unit tests (no web_sys dependency).
///
/// The atlas renders square at `width:100%`, so both axes share the scale
/// factor `MAP_WIDTH_PX / container_w`.
pub fn client_to_map_px_zoomed(
    container_x: f64,
    container_y: f64,
    container_w: f64,
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
) -> Option<(f64, f64)> {
    if container_w <= 0.0 || zoom <= 0.0 {
        return None;
    }

    // Undo CSS transform: translate(pan_x, pan_y) scale(zoom)
    let rendered_x = (container_x - pan_x) / zoom;
    let rendered_y = (container_y - pan_y) / zoom;

    let scale = grid::MAP_WIDTH_PX / container_w;
    Some((rendered_x * scale, rendered_y * scale))
}

/// Tile under a container-relative point, or `None` off the map.
pub fn container_to_tile(
    container_x: f64,
    container_y: f64,
    container_w: f64,
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
) -> Option<(i32, i32)> {
    let (px, py) = client_to_map_px_zoomed(container_x, container_y, container_w, zoom, pan_x, pan_y)?;
    grid::px_to_tile(px, py)
}

/// Get container-relative click coordinates using web_sys, then resolve the
/// tile under the cursor.
pub fn click_to_tile(
    client_x: f64,
    client_y: f64,
    container_id: &str,
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
) -> Option<(i32, i32)> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(container_id)?;
    let rect = element.get_bounding_client_rect();

    container_to_tile(
        client_x - rect.left(),
        client_y - rect.top(),
        rect.width(),
        zoom,
        pan_x,
        pan_y,
    )
}

use super::body::Body;

/// Applies gravity, horizontal intent and lift to the body, then moves it by the result.
pub fn integrate(body: &mut Body) {
    let tuning = body.tuning;
    let intents = body.intents;

    body.velocity.y += tuning.gravity;

    // No horizontal inertia: vx is reassigned every frame.
    body.velocity.x = match (intents.moving_right, intents.moving_left) {
        (true, false) => tuning.horizontal_speed,
        (false, true) => -tuning.horizontal_speed,
        _ => 0.0,
    };

    if intents.lifting {
        body.velocity.y -= tuning.lift_acceleration;
    }

    body.velocity.y = clamp_symmetric(body.velocity.y, tuning.vertical_speed_cap);

    body.position.x += body.velocity.x;
    body.position.y += body.velocity.y;
}

fn clamp_symmetric(value: f32, cap: f32) -> f32 {
    if value > cap {
        cap
    } else if value < -cap {
        -cap
    } else {
        value
    }
}

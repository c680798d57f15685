use crate::{
    api::{admin, attendance, employee, payroll},
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build a per-route limiter config; Governor instances built
    // from the same config share one counter.
    fn build_limiter(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    let login_limiter = build_limiter(config.rate_login_per_min);
    let punch_limiter = build_limiter(config.rate_punch_per_min);
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    // Public routes: admin auth and the PIN-authenticated punch
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(Governor::new(&login_limiter))
                    .route(web::post().to(admin::login)),
            )
            .service(
                web::resource("/reset/request")
                    .wrap(Governor::new(&login_limiter))
                    .route(web::post().to(admin::reset_request)),
            )
            .service(
                web::resource("/reset/confirm")
                    .wrap(Governor::new(&login_limiter))
                    .route(web::post().to(admin::reset_confirm)),
            ),
    );

    cfg.service(
        web::resource("/punch")
            .wrap(Governor::new(&punch_limiter))
            .route(web::post().to(attendance::punch_in)),
    );

    // Protected admin routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(Governor::new(&protected_limiter))
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance/today — the live board
                    .service(
                        web::resource("/today").route(web::get().to(attendance::today_board)),
                    )
                    // /attendance
                    .service(
                        web::resource("").route(web::get().to(attendance::attendance_history)),
                    ),
            )
            .service(
                web::scope("/payroll")
                    // /payroll/sheet — CSV export
                    .service(web::resource("/sheet").route(web::get().to(payroll::payroll_sheet)))
                    // /payroll
                    .service(web::resource("").route(web::get().to(payroll::compute_payroll))),
            ),
    );
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ReportService, cached_response, load_evaluatee_in_scope};
use crate::middlewares::SessionContext;
use crate::models::reports::requests::{AnnexBParams, PeriodReportParams};
use crate::models::reports::responses::{
    AnnexAResponse, AnnexBResponse, AnnexCResponse, AnnexDResponse,
};
use crate::models::users::entities::UserSummary;
use crate::models::{ApiResponse, ErrorCode};
use crate::scoring::AcademicPeriod;
use crate::scoring::annex::{
    AnnexAFilter, build_annex_a, build_annex_b, build_annex_c, period_scores,
};
use crate::scoring::period::parse_school_year;
use crate::services::storage_failure_response;

fn invalid_period(msg: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::InvalidPeriod, msg))
}

fn period_of(params: &PeriodReportParams) -> Result<AcademicPeriod, HttpResponse> {
    let school_year = params.school_year.trim();
    parse_school_year(school_year).map_err(invalid_period)?;
    Ok(AcademicPeriod::new(school_year, params.semester))
}

fn period_cache_key(period: &AcademicPeriod) -> String {
    format!("{}:{}", period.school_year, period.semester)
}

fn report_ok<T: serde::Serialize + ts_rs::TS>(report: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(report, "Report retrieved successfully"))
}

pub async fn annex_a(
    service: &ReportService,
    session: SessionContext,
    evaluatee_id: i64,
    params: PeriodReportParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let period = match period_of(&params) {
        Ok(period) => period,
        Err(response) => return Ok(response),
    };
    let filter = AnnexAFilter {
        subject_id: params.subject_id,
        section: params
            .section
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    };

    let storage = service.get_storage(request)?;
    let evaluatee = match load_evaluatee_in_scope(&storage, &session, evaluatee_id).await {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let cache_params = format!(
        "{}:{}:{}",
        period_cache_key(&period),
        filter.subject_id.map(|id| id.to_string()).unwrap_or_default(),
        filter.section.as_deref().unwrap_or_default().to_lowercase()
    );
    let cache = service
        .report_cache(request, "annex_a", evaluatee.id, &cache_params)
        .await;
    if let Some(cache) = &cache
        && let Some(report) = cache.get().await
    {
        return Ok(cached_response(report));
    }

    let records = match storage
        .list_evaluation_records(evaluatee.id, std::slice::from_ref(&period))
        .await
    {
        Ok(records) => records,
        Err(e) => return Ok(storage_failure_response(&e, "Failed to load evaluations")),
    };

    let track = evaluatee.track();
    let response = AnnexAResponse {
        evaluatee: UserSummary::from(&evaluatee),
        track,
        report: build_annex_a(&records, &period, &filter, track),
    };
    if let Some(cache) = &cache {
        cache.put(&response).await;
    }
    Ok(report_ok(response))
}

pub async fn annex_b(
    service: &ReportService,
    session: SessionContext,
    evaluatee_id: i64,
    params: AnnexBParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let start_year = match parse_school_year(params.start_school_year.trim()) {
        Ok(year) => year,
        Err(msg) => return Ok(invalid_period(msg)),
    };

    let storage = service.get_storage(request)?;
    let evaluatee = match load_evaluatee_in_scope(&storage, &session, evaluatee_id).await {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let cache = service
        .report_cache(request, "annex_b", evaluatee.id, &start_year.to_string())
        .await;
    if let Some(cache) = &cache
        && let Some(report) = cache.get().await
    {
        return Ok(cached_response(report));
    }

    let periods = crate::scoring::period::projected_periods(start_year);
    let records = match storage.list_evaluation_records(evaluatee.id, &periods).await {
        Ok(records) => records,
        Err(e) => return Ok(storage_failure_response(&e, "Failed to load evaluations")),
    };

    let response = AnnexBResponse {
        evaluatee: UserSummary::from(&evaluatee),
        report: build_annex_b(&records, start_year, evaluatee.track()),
    };
    if let Some(cache) = &cache {
        cache.put(&response).await;
    }
    Ok(report_ok(response))
}

pub async fn annex_c(
    service: &ReportService,
    session: SessionContext,
    evaluatee_id: i64,
    params: PeriodReportParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let period = match period_of(&params) {
        Ok(period) => period,
        Err(response) => return Ok(response),
    };

    let storage = service.get_storage(request)?;
    let evaluatee = match load_evaluatee_in_scope(&storage, &session, evaluatee_id).await {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let cache = service
        .report_cache(request, "annex_c", evaluatee.id, &period_cache_key(&period))
        .await;
    if let Some(cache) = &cache
        && let Some(report) = cache.get().await
    {
        return Ok(cached_response(report));
    }

    let records = match storage
        .list_evaluation_records(evaluatee.id, std::slice::from_ref(&period))
        .await
    {
        Ok(records) => records,
        Err(e) => return Ok(storage_failure_response(&e, "Failed to load evaluations")),
    };

    let response = AnnexCResponse {
        evaluatee: UserSummary::from(&evaluatee),
        track: evaluatee.track(),
        report: build_annex_c(&records, &period),
    };
    if let Some(cache) = &cache {
        cache.put(&response).await;
    }
    Ok(report_ok(response))
}

pub async fn annex_d(
    service: &ReportService,
    session: SessionContext,
    evaluatee_id: i64,
    params: PeriodReportParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let period = match period_of(&params) {
        Ok(period) => period,
        Err(response) => return Ok(response),
    };

    let storage = service.get_storage(request)?;
    let evaluatee = match load_evaluatee_in_scope(&storage, &session, evaluatee_id).await {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let cache = service
        .report_cache(request, "annex_d", evaluatee.id, &period_cache_key(&period))
        .await;
    if let Some(cache) = &cache
        && let Some(report) = cache.get().await
    {
        return Ok(cached_response(report));
    }

    let records = match storage
        .list_evaluation_records(evaluatee.id, std::slice::from_ref(&period))
        .await
    {
        Ok(records) => records,
        Err(e) => return Ok(storage_failure_response(&e, "Failed to load evaluations")),
    };

    let college_name = match evaluatee.college_id {
        Some(id) => match storage.get_college_by_id(id).await {
            Ok(college) => college.map(|c| c.name),
            Err(e) => return Ok(storage_failure_response(&e, "Failed to get college")),
        },
        None => None,
    };
    let program_name = match evaluatee.program_id {
        Some(id) => match storage.get_program_by_id(id).await {
            Ok(program) => program.map(|p| p.name),
            Err(e) => return Ok(storage_failure_response(&e, "Failed to get program")),
        },
        None => None,
    };
    let signatories = match super::signatories::resolve_signatories(&storage, &evaluatee).await {
        Ok(signatories) => signatories,
        Err(e) => return Ok(storage_failure_response(&e, "Failed to resolve signatories")),
    };

    let response = AnnexDResponse {
        evaluatee: UserSummary::from(&evaluatee),
        college_name,
        program_name,
        scores: period_scores(&records, &period, evaluatee.track()),
        period,
        signatories,
    };
    // 签字人变动不会更新纪元，Annex D 只在 TTL 内复用
    if let Some(cache) = &cache {
        cache.put(&response).await;
    }
    Ok(report_ok(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Semester;

    #[test]
    fn test_period_params_validated() {
        let params = PeriodReportParams {
            school_year: " 2023-2024 ".to_string(),
            semester: Semester::Second,
            subject_id: None,
            section: None,
        };
        let period = period_of(&params).unwrap();
        assert_eq!(period.school_year, "2023-2024");
        assert_eq!(period_cache_key(&period), "2023-2024:second");

        let bad = PeriodReportParams {
            school_year: "2023".to_string(),
            ..params
        };
        assert_eq!(
            period_of(&bad).unwrap_err().status(),
            actix_web::http::StatusCode::BAD_REQUEST
        );
    }
}

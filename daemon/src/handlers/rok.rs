use kale_rpc_rok::{RequestContext, RpcError};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::protocol::*;
use crate::state::DaemonState;

fn params<T: DeserializeOwned>(request: &Request, ctx: &RequestContext) -> Result<T, Reply> {
    parse_params(&request.params).map_err(|e| {
        ErrorResponse::new(request.id, INVALID_PARAMS, e)
            .with_trans_id(ctx.trans_id())
            .into()
    })
}

fn respond<T: Serialize>(request: &Request, result: Result<T, RpcError>) -> Reply {
    match result {
        Ok(value) => Reply::success(request.id, value),
        Err(e) => ErrorResponse::from_rpc(request.id, e).into(),
    }
}

pub async fn handle_get_task(request: &Request, state: &DaemonState, ctx: &RequestContext) -> Reply {
    let p: GetTaskParams = match params(request, ctx) {
        Ok(p) => p,
        Err(reply) => return reply,
    };
    respond(request, state.rok.get_task(ctx, &p.task_id, &p.bucket).await)
}

pub async fn handle_snapshot_notebook(
    request: &Request,
    state: &DaemonState,
    ctx: &RequestContext,
) -> Reply {
    let p: SnapshotNotebookParams = match params(request, ctx) {
        Ok(p) => p,
        Err(reply) => return reply,
    };
    respond(
        request,
        state
            .rok
            .snapshot_notebook(ctx, &p.bucket, p.object.as_deref())
            .await,
    )
}

pub async fn handle_snapshot_pvc(
    request: &Request,
    state: &DaemonState,
    ctx: &RequestContext,
) -> Reply {
    let p: SnapshotPvcParams = match params(request, ctx) {
        Ok(p) => p,
        Err(reply) => return reply,
    };
    respond(request, state.rok.snapshot_pvc(ctx, &p.pvc_name, &p.bucket).await)
}

pub async fn handle_hydrate_pvc(
    request: &Request,
    state: &DaemonState,
    ctx: &RequestContext,
) -> Reply {
    let p: HydratePvcParams = match params(request, ctx) {
        Ok(p) => p,
        Err(reply) => return reply,
    };
    respond(
        request,
        state
            .rok
            .hydrate_pvc_from_snapshot(ctx, &p.object, &p.version, &p.new_pvc_name, &p.bucket)
            .await,
    )
}

pub async fn handle_replace_cloned_volumes(
    request: &Request,
    state: &DaemonState,
    ctx: &RequestContext,
) -> Reply {
    let p: ReplaceClonedVolumesParams = match params(request, ctx) {
        Ok(p) => p,
        Err(reply) => return reply,
    };
    respond(
        request,
        state
            .rok
            .replace_cloned_volumes(ctx, &p.bucket, &p.object, &p.version, &p.volumes)
            .await,
    )
}

pub async fn handle_check_availability(
    request: &Request,
    state: &DaemonState,
    ctx: &RequestContext,
) -> Reply {
    respond(request, state.rok.check_rok_availability(ctx).await)
}

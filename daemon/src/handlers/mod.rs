pub mod auth;
pub mod rok;

use std::sync::Arc;
use std::time::Instant;

use kale_rpc_rok::RequestContext;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::protocol::*;
use crate::state::{ClientId, DaemonState};

/// Dispatch a request to the appropriate handler
pub async fn dispatch(request: &Request, state: Arc<DaemonState>, client_id: ClientId) -> Reply {
    let start = Instant::now();
    let method = request.method.as_str();
    let id = request.id;
    let trans_id = request
        .trans_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = info_span!("rok_rpc", trans_id = %trans_id, method = %method, client = client_id);
    let ctx = RequestContext::new(trans_id).with_span(span.clone());

    async {
        debug!("[dispatch] → id={} method={}", id, method);

        let response = match method {
            METHOD_AUTH => auth::handle(request, &state),
            METHOD_ROK_GET_TASK => rok::handle_get_task(request, &state, &ctx).await,
            METHOD_ROK_SNAPSHOT_NOTEBOOK => rok::handle_snapshot_notebook(request, &state, &ctx).await,
            METHOD_ROK_SNAPSHOT_PVC => rok::handle_snapshot_pvc(request, &state, &ctx).await,
            METHOD_ROK_HYDRATE_PVC => rok::handle_hydrate_pvc(request, &state, &ctx).await,
            METHOD_ROK_REPLACE_CLONED_VOLUMES => {
                rok::handle_replace_cloned_volumes(request, &state, &ctx).await
            }
            METHOD_ROK_CHECK_AVAILABILITY => {
                rok::handle_check_availability(request, &state, &ctx).await
            }
            _ => {
                warn!("[dispatch] Unknown method: {}", method);
                ErrorResponse::new(id, INVALID_PARAMS, format!("Unknown method: {method}"))
                    .with_trans_id(ctx.trans_id())
                    .into()
            }
        };

        let elapsed = start.elapsed();
        if response.is_error() {
            info!("[dispatch] ← id={} method={} error elapsed={:?}", id, method, elapsed);
        } else {
            debug!("[dispatch] ← id={} method={} ok elapsed={:?}", id, method, elapsed);
        }

        response
    }
    .instrument(span)
    .await
}

use super::Phase;
use crate::common::HttpResponse;
use crate::controller::{
    Controller, ControllerEvent, ControllerMethods, ExitSignal, Flow, MethodSet,
};
use crate::di::Container;
use crate::error::{ControllerError, Result};
use tracing::Instrument;
use uuid::Uuid;

/// Runs a controller through its lifecycle phases.
///
/// The orchestrator owns no state besides the dependency container, so one can be
/// created per request or shared between many.
pub struct Lifecycle<'a> {
    container: &'a Container,
}

/// Awaits one phase and returns early from `run_phases` if it exited.
macro_rules! run_phase {
    ($controller:expr, $phase:expr, $call:expr) => {{
        tracing::debug!(phase = %$phase, "Entering phase");
        let result = $call.await;
        if let Some(exit) = settle($controller, $phase, result)? {
            return Ok(Some(exit));
        }
    }};
}

impl<'a> Lifecycle<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Run every phase for `controller` and return the response it sent.
    ///
    /// Shutdown runs exactly once, whether the request ended with a response, an
    /// error, or neither.
    pub async fn dispatch<C>(&self, controller: &mut C) -> Result<HttpResponse>
    where
        C: Controller + ControllerMethods,
    {
        let methods = MethodSet::<C>::shared();
        let span = tracing::debug_span!(
            "lifecycle",
            id = %Uuid::new_v4(),
            controller = C::NAME,
            action = %controller.action(),
        );

        async move {
            let outcome = self.run_phases(&methods, controller).await;
            let shutdown = run_shutdown(&methods, controller).await;
            finish(controller, outcome, shutdown)
        }
        .instrument(span)
        .await
    }

    async fn run_phases<C>(
        &self,
        methods: &MethodSet<C>,
        controller: &mut C,
    ) -> Result<Option<ExitSignal>>
    where
        C: Controller + ControllerMethods,
    {
        for (name, inject) in methods.injectors() {
            let inject = *inject;
            let dependency = self.container.get(name)?;
            run_phase!(controller, Phase::Inject, inject(controller, dependency));
        }

        controller.context_mut().dispatch_event(ControllerEvent::Startup);
        if let Some(startup) = methods.startup() {
            run_phase!(controller, Phase::Startup, startup(controller));
        }

        let params = controller.params().clone();
        let action = controller.action().to_owned();
        if let Some(handler) = methods.action(&action) {
            run_phase!(controller, Phase::Action, handler(controller, &params));
        }

        if let Some(before_render) = methods.before_render() {
            run_phase!(controller, Phase::BeforeRender, before_render(controller));
        }

        controller.context_mut().dispatch_event(ControllerEvent::Render);
        let view = controller.view().to_owned();
        match methods.render(&view) {
            Some(render) => run_phase!(controller, Phase::Render, render(controller, &params)),
            None => tracing::debug!(view = %view, "No render method for view"),
        }

        if let Some(after_render) = methods.after_render() {
            run_phase!(controller, Phase::AfterRender, after_render(controller));
        }

        Ok(None)
    }
}

async fn run_shutdown<C>(methods: &MethodSet<C>, controller: &mut C) -> Result<Flow>
where
    C: Controller + ControllerMethods,
{
    controller.context_mut().dispatch_event(ControllerEvent::Shutdown);
    match methods.shutdown() {
        Some(shutdown) => {
            tracing::debug!(phase = %Phase::Shutdown, "Entering phase");
            shutdown(controller).await
        }
        None => Ok(Flow::Continue),
    }
}

fn settle<C: Controller>(
    controller: &C,
    phase: Phase,
    result: Result<Flow>,
) -> Result<Option<ExitSignal>> {
    if result.is_ok() {
        reject_second_response(controller, phase)?;
    }
    match result {
        Ok(Flow::Exit(exit)) => {
            tracing::debug!(%phase, "Response sent");
            Ok(Some(exit))
        }
        Ok(Flow::Continue) => Ok(recover_exit(controller, phase)),
        Err(e) => {
            tracing::debug!(%phase, error = %e, "Phase failed");
            Err(e)
        }
    }
}

/// A second response fails even when the method discarded the error it got.
fn reject_second_response<C: Controller>(controller: &C, phase: Phase) -> Result<()> {
    if !controller.context().sent_twice() {
        return Ok(());
    }
    tracing::debug!(%phase, "Response was sent twice");
    Err(ControllerError::DoubleExit {
        controller: C::NAME.to_string(),
    })
}

/// A response was recorded but the method returned `Continue` instead of the exit.
fn recover_exit<C: Controller>(controller: &C, phase: Phase) -> Option<ExitSignal> {
    let response = controller.http_response()?.clone();
    tracing::warn!(
        %phase,
        controller = C::NAME,
        "Response was sent without returning its exit; ending the lifecycle"
    );
    Some(ExitSignal::new(C::NAME, response))
}

fn finish<C: Controller>(
    controller: &C,
    outcome: Result<Option<ExitSignal>>,
    shutdown: Result<Flow>,
) -> Result<HttpResponse> {
    if outcome.is_ok() && shutdown.is_ok() {
        reject_second_response(controller, Phase::Shutdown)?;
    }
    match (outcome, shutdown) {
        (Ok(Some(exit)), Ok(Flow::Continue)) => Ok(exit.into_response()),
        (Ok(Some(_)), Ok(Flow::Exit(_))) => Err(ControllerError::DoubleExit {
            controller: C::NAME.to_string(),
        }),
        (Ok(None), Ok(Flow::Exit(exit))) => Ok(exit.into_response()),
        (Ok(None), Ok(Flow::Continue)) => match recover_exit(controller, Phase::Shutdown) {
            Some(exit) => Ok(exit.into_response()),
            None => Err(ControllerError::LifecycleIncomplete {
                controller: C::NAME.to_string(),
                action: controller.action().to_string(),
            }),
        },
        (Ok(_), Err(e)) => {
            tracing::debug!(error = %e, "Shutdown failed");
            Err(e)
        }
        (Err(e), Ok(_)) => Err(e),
        (Err(e), Err(suppressed)) => {
            tracing::warn!(error = %suppressed, "Shutdown failed while handling an earlier error");
            Err(e.with_suppressed(suppressed))
        }
    }
}

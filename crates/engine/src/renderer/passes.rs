use egui_wgpu::wgpu;
use wgpu::{CommandEncoder, Queue, TextureView};

use crate::Scene;

/// Contexte fourni à chaque pass lors de l'exécution.
/// Contient des références vers les ressources par-frame (encoder, target, queue, scène).
pub struct PassContext<'a> {
    pub encoder: &'a mut CommandEncoder,
    pub target: &'a TextureView,
    pub queue: &'a Queue,
    pub scene: &'a Scene,
}

/// Une passe de rendu.
/// - `prepare` : appelé occasionnellement (par ex. au chargement ou quand le device change)
/// - `execute` : appelé chaque frame ; démarre ses propres render passes si nécessaire.
pub trait RenderPass {
    /// Nom (utile pour debug/logging).
    fn name(&self) -> &str;

    fn prepare(&mut self, _device: &wgpu::Device, _queue: &Queue) {}

    fn execute(&self, ctx: &mut PassContext);
}

/// Gestionnaire de passes. Garde les passes dans un vecteur et les exécute dans l'ordre.
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn RenderPass + Send + Sync>>,
}

impl PassManager {
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    pub fn add<P: RenderPass + Send + Sync + 'static>(&mut self, pass: P) {
        log::debug!("Adding render pass '{}'", pass.name());
        self.passes.push(Box::new(pass));
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Noms des passes, dans l'ordre d'exécution.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.passes.iter().map(|p| p.name())
    }

    pub fn prepare_all(&mut self, device: &wgpu::Device, queue: &Queue) {
        for p in &mut self.passes {
            p.prepare(device, queue);
        }
    }

    pub fn execute_all(&self, ctx: &mut PassContext) {
        for p in &self.passes {
            log::trace!("Executing pass: {}", p.name());
            p.execute(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NamedPass(&'static str);

    impl RenderPass for NamedPass {
        fn name(&self) -> &str {
            self.0
        }

        fn execute(&self, _ctx: &mut PassContext) {}
    }

    #[test]
    fn passes_keep_insertion_order() {
        let mut manager = PassManager::new();
        assert!(manager.is_empty());

        manager.add(NamedPass("sky"));
        manager.add(NamedPass("hud"));
        manager.add(NamedPass("post"));

        assert!(!manager.is_empty());
        assert_eq!(manager.names().collect::<Vec<_>>(), ["sky", "hud", "post"]);
    }
}
